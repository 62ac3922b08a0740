//! Process-local backend.

use std::collections::HashMap;

use async_trait::async_trait;
use personalizer_core::backend::KeyValueBackend;
use personalizer_core::error::Result;
use serde_json::Value;
use tokio::sync::Mutex;

/// Keeps values in a map for the lifetime of the process.
///
/// Share one instance (behind an `Arc`) between stores to simulate several
/// contexts on the same host storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `value` under `key`.
    pub fn with_value(key: impl Into<String>, value: Value) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value);
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
