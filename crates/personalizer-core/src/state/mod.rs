//! Persisted state domain module.
//!
//! # Module Structure
//!
//! - `model`: The root record (`PersistedState`) and its parts
//! - `defaults`: Canonical default instance built from the presets
//! - `repository`: Store access trait implemented by the infrastructure crate

pub mod defaults;
pub mod model;
pub mod repository;

pub use defaults::create_default;
pub use model::{
    HISTORY_LIMIT, HistoryEntry, PersistedState, STORAGE_KEY, STORAGE_VERSION, StateFlags,
};
pub use repository::{StateMutator, StateRepository};
