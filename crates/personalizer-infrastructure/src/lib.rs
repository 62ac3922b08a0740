pub mod backend;
pub mod config_service;
pub mod migration;
pub mod paths;
pub mod state_store;
pub mod storage;

pub use crate::backend::{JsonFileBackend, MemoryBackend, resolve_backend};
pub use crate::config_service::ConfigService;
pub use crate::migration::{migrate, migrate_state};
pub use crate::state_store::StateStore;
