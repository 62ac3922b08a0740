//! State repository trait.

use async_trait::async_trait;

use crate::bus::Subscription;
use crate::state::model::PersistedState;

/// A pure state transition handed to [`StateRepository::update`].
///
/// The mutator receives an owned copy of the current state and returns the
/// next one.
pub type StateMutator = Box<dyn FnOnce(PersistedState) -> PersistedState + Send>;

/// Store access for the persisted state.
///
/// None of these methods fail: backend problems degrade to defaults on read
/// and to a dropped write on write, and are only logged.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Loads and migrates the current state.
    async fn read(&self) -> PersistedState;

    /// Persists the given state as-is.
    async fn write(&self, state: &PersistedState);

    /// Read, apply `mutator`, migrate, write, return the written state.
    async fn update(&self, mutator: StateMutator) -> PersistedState;

    /// Subscribes to states written through this repository.
    fn watch(&self) -> Subscription<PersistedState>;
}
