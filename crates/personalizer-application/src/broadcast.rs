//! Relays runtime messages to every live context.
//!
//! Each registered context owns an inbox. Delivery is best-effort: a context
//! whose inbox is closed is logged, dropped from the registry and skipped,
//! and the remaining contexts still receive the message.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use personalizer_core::message::RuntimeMessage;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::context::{ContextId, ContextKind};

struct Registration {
    kind: ContextKind,
    inbox: UnboundedSender<RuntimeMessage>,
}

type Registrations = Mutex<HashMap<ContextId, Registration>>;

/// Shared table of live contexts. Clones refer to the same table.
#[derive(Clone, Default)]
pub struct ContextRegistry {
    contexts: Arc<Registrations>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a context and returns its handle.
    ///
    /// The context stays registered until the handle is dropped.
    pub fn register(&self, kind: ContextKind) -> ContextHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = ContextId::new();
        self.lock().insert(
            id,
            Registration {
                kind,
                inbox: sender,
            },
        );
        tracing::debug!(context = %kind, id = %id, "Context registered");

        ContextHandle {
            id,
            kind,
            inbox: receiver,
            contexts: Arc::downgrade(&self.contexts),
        }
    }

    /// Sends `message` to every live context except `origin`.
    ///
    /// Returns the number of contexts it was delivered to.
    pub fn broadcast(&self, message: &RuntimeMessage, origin: Option<ContextId>) -> usize {
        let mut contexts = self.lock();
        let mut delivered = 0;
        let mut unreachable = Vec::new();

        for (id, registration) in contexts.iter() {
            if Some(*id) == origin {
                continue;
            }
            if registration.inbox.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                unreachable.push(*id);
            }
        }

        for id in unreachable {
            if let Some(registration) = contexts.remove(&id) {
                tracing::warn!(
                    context = %registration.kind,
                    message = message.kind(),
                    "Failed to deliver broadcast, dropping context"
                );
            }
        }

        tracing::debug!(message = message.kind(), delivered, "Broadcast sent");
        delivered
    }

    /// Kinds of the contexts currently registered.
    pub fn live_contexts(&self) -> Vec<ContextKind> {
        self.lock().values().map(|r| r.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ContextId, Registration>> {
        self.contexts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ContextRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("contexts", &self.len())
            .finish()
    }
}

/// A context's registration and inbox.
pub struct ContextHandle {
    id: ContextId,
    kind: ContextKind,
    inbox: UnboundedReceiver<RuntimeMessage>,
    contexts: Weak<Registrations>,
}

impl ContextHandle {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Waits for the next broadcast. Returns `None` once the registry is gone.
    pub async fn recv(&mut self) -> Option<RuntimeMessage> {
        self.inbox.recv().await
    }

    /// Returns the next pending broadcast without waiting.
    pub fn try_recv(&mut self) -> Option<RuntimeMessage> {
        self.inbox.try_recv().ok()
    }

    /// Stops accepting broadcasts while staying registered, as a tab does
    /// when it navigates away. The next broadcast drops the registration.
    pub fn close(&mut self) {
        self.inbox.close();
    }
}

impl Drop for ContextHandle {
    fn drop(&mut self) {
        if let Some(contexts) = self.contexts.upgrade() {
            contexts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
            tracing::debug!(context = %self.kind, id = %self.id, "Context unregistered");
        }
    }
}

impl std::fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}
