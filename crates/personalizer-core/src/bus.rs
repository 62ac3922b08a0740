//! In-process publish/subscribe bus.
//!
//! Each subscriber owns an unbounded channel. `publish` clones the event into
//! every live channel; subscribers whose receiving side is gone are pruned on
//! the next publish. There is no replay: an event reaches only the
//! subscribers registered at the time it is published.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

type Subscribers<E> = Mutex<HashMap<Uuid, UnboundedSender<E>>>;

/// A cloneable handle to a shared set of subscribers.
pub struct EventBus<E> {
    subscribers: Arc<Subscribers<E>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> EventBus<E>
where
    E: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription<E> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.lock().insert(id, sender);
        tracing::debug!(subscriber = %id, "Subscriber registered");

        Subscription {
            id,
            receiver,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Delivers `event` to every live subscriber.
    ///
    /// Returns the number of subscribers the event was handed to.
    pub fn publish(&self, event: E) -> usize {
        let mut subscribers = self.lock();
        let mut delivered = 0;
        let mut dead = Vec::new();

        for (id, sender) in subscribers.iter() {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*id);
            }
        }

        for id in dead {
            tracing::warn!(subscriber = %id, "Dropping unreachable subscriber");
            subscribers.remove(&id);
        }

        delivered
    }
}

impl<E> EventBus<E> {
    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, UnboundedSender<E>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving side of a bus registration.
///
/// Dropping the subscription unsubscribes it.
pub struct Subscription<E> {
    id: Uuid,
    receiver: UnboundedReceiver<E>,
    subscribers: Weak<Subscribers<E>>,
}

impl<E> Subscription<E> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Waits for the next event. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<E> {
        self.receiver.recv().await
    }

    /// Returns the next pending event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        self.receiver.try_recv().ok()
    }

    /// Removes this subscriber from the bus.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish("reload".to_string()), 2);
        assert_eq!(first.recv().await.as_deref(), Some("reload"));
        assert_eq!(second.recv().await.as_deref(), Some("reload"));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let mut second = bus.subscribe();

        first.unsubscribe();
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.publish(7), 1);
        assert_eq!(second.try_recv(), Some(7));
        assert_eq!(second.try_recv(), None);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(1);
        let mut late = bus.subscribe();
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus = EventBus::<u8>::new();
        let mut sub = bus.subscribe();
        drop(bus);
        assert_eq!(sub.try_recv(), None);
    }
}
