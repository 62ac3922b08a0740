//! JSON file backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use personalizer_core::backend::KeyValueBackend;
use personalizer_core::error::{PersonalizerError, Result};
use serde_json::Value;

use crate::storage::AtomicJsonFile;

type Entries = BTreeMap<String, Value>;

/// Stores every key in a single JSON object file.
///
/// File I/O runs on the blocking pool. Writes take an exclusive lock so
/// several processes can share one file; a concurrent writer of the same key
/// still wins or loses as a whole (last writer wins). A file that no longer
/// parses fails reads and is replaced by the next write.
#[derive(Clone)]
pub struct JsonFileBackend {
    file: Arc<AtomicJsonFile<Entries>>,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl KeyValueBackend for JsonFileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let file = Arc::clone(&self.file);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<Value>> {
            let mut entries = file.load()?.unwrap_or_default();
            Ok(entries.remove(&key))
        })
        .await
        .map_err(|e| PersonalizerError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let file = Arc::clone(&self.file);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || -> Result<()> {
            file.update_or_reset(Entries::new(), |entries| {
                entries.insert(key, value);
                Ok(())
            })?;
            Ok(())
        })
        .await
        .map_err(|e| PersonalizerError::internal(format!("Failed to join task: {}", e)))?
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
