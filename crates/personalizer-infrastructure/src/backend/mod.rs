//! Key-value backends for the state store.
//!
//! The backend is picked once from configuration via [`resolve_backend`] and
//! injected into every [`crate::StateStore`]; nothing re-derives it later.

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use personalizer_core::backend::KeyValueBackend;
use personalizer_core::config::{BackendKind, StorageConfig};
use personalizer_core::error::{PersonalizerError, Result};

use crate::paths::PersonalizerPaths;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Builds the configured backend.
///
/// Returns `Ok(None)` for [`BackendKind::None`]. A file backend without an
/// explicit path uses the platform data directory.
pub fn resolve_backend(config: &StorageConfig) -> Result<Option<Arc<dyn KeyValueBackend>>> {
    let backend: Option<Arc<dyn KeyValueBackend>> = match config.backend {
        BackendKind::None => None,
        BackendKind::Memory => Some(Arc::new(MemoryBackend::new())),
        BackendKind::File => {
            let path = match &config.path {
                Some(path) => path.clone(),
                None => default_state_file()?,
            };
            Some(Arc::new(JsonFileBackend::new(path)))
        }
    };

    match &backend {
        Some(b) => tracing::info!(backend = b.name(), "Storage backend resolved"),
        None => tracing::info!("No storage backend configured, state will not persist"),
    }

    Ok(backend)
}

fn default_state_file() -> Result<PathBuf> {
    PersonalizerPaths::state_file().map_err(|e| PersonalizerError::config(e.to_string()))
}
