//! Store access layer for the persisted state.
//!
//! All state changes go through [`StateStore::update`], which migrates the
//! mutator's output before writing it. Backend failures never reach callers:
//! reads fall back to defaults and writes are dropped, both with a warning.

use std::sync::Arc;

use async_trait::async_trait;
use personalizer_core::backend::KeyValueBackend;
use personalizer_core::bus::{EventBus, Subscription};
use personalizer_core::persona::Persona;
use personalizer_core::state::{
    PersistedState, STORAGE_KEY, StateMutator, StateRepository, create_default,
};

use crate::backend::MemoryBackend;
use crate::migration::{migrate, migrate_state};

/// Reads and writes the persisted state through an injected backend.
///
/// Clones share the backend and the change bus.
#[derive(Clone)]
pub struct StateStore {
    backend: Option<Arc<dyn KeyValueBackend>>,
    changes: EventBus<PersistedState>,
}

impl StateStore {
    /// Creates a store over `backend` (`None` when the context has no storage).
    pub fn new(backend: Option<Arc<dyn KeyValueBackend>>) -> Self {
        Self::with_change_bus(backend, EventBus::new())
    }

    /// Creates a store publishing writes on an existing bus.
    ///
    /// Stores over the same backend should share a bus so each one observes
    /// the others' writes.
    pub fn with_change_bus(
        backend: Option<Arc<dyn KeyValueBackend>>,
        changes: EventBus<PersistedState>,
    ) -> Self {
        Self { backend, changes }
    }

    /// Creates a store over a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(Some(Arc::new(MemoryBackend::new())))
    }

    /// Returns true if a backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Loads the current state.
    ///
    /// Without a backend this is the default state. A backend error is logged
    /// and also yields the default state.
    pub async fn read(&self) -> PersistedState {
        let Some(backend) = &self.backend else {
            return create_default();
        };

        match backend.get(STORAGE_KEY).await {
            Ok(raw) => migrate(raw.as_ref()),
            Err(e) => {
                tracing::warn!(
                    backend = backend.name(),
                    "Failed to read personalization state, falling back to defaults: {}",
                    e
                );
                create_default()
            }
        }
    }

    /// Persists `state` exactly as given.
    ///
    /// Callers are expected to pass migrated state; use [`StateStore::update`]
    /// for changes. A no-op without a backend; failures are logged and dropped.
    pub async fn write(&self, state: &PersistedState) {
        let Some(backend) = &self.backend else {
            return;
        };

        let value = match serde_json::to_value(state) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize personalization state: {}", e);
                return;
            }
        };

        match backend.set(STORAGE_KEY, value).await {
            Ok(()) => {
                let notified = self.changes.publish(state.clone());
                tracing::debug!(notified, "Personalization state written");
            }
            Err(e) => {
                tracing::warn!(
                    backend = backend.name(),
                    "Failed to write personalization state: {}",
                    e
                );
            }
        }
    }

    /// Applies `mutator` to the current state and persists the migrated result.
    ///
    /// The mutator owns its input, so nothing it does can leak into other
    /// readers. Returns the state that was written.
    pub async fn update<F>(&self, mutator: F) -> PersistedState
    where
        F: FnOnce(PersistedState) -> PersistedState,
    {
        let current = self.read().await;
        let next = migrate_state(mutator(current));
        self.write(&next).await;
        next
    }

    /// Appends a history entry for `persona_id` stamped with the current time.
    pub async fn push_history(&self, persona_id: &str) -> PersistedState {
        let persona_id = persona_id.to_string();
        self.update(move |mut state| {
            state.push_history(persona_id, personalizer_core::now_millis());
            state
        })
        .await
    }

    /// Returns the active persona of the current state.
    pub async fn active_persona(&self) -> Option<Persona> {
        self.read().await.active_persona().cloned()
    }

    /// Subscribes to states written through this store (or any store sharing its bus).
    pub fn watch(&self) -> Subscription<PersistedState> {
        self.changes.subscribe()
    }
}

#[async_trait]
impl StateRepository for StateStore {
    async fn read(&self) -> PersistedState {
        StateStore::read(self).await
    }

    async fn write(&self, state: &PersistedState) {
        StateStore::write(self, state).await
    }

    async fn update(&self, mutator: StateMutator) -> PersistedState {
        StateStore::update(self, mutator).await
    }

    fn watch(&self) -> Subscription<PersistedState> {
        StateStore::watch(self)
    }
}
