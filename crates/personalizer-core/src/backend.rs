//! Key-value backend seam.
//!
//! The persisted record lives in a host-provided key-value store. Which store
//! is used is decided once at startup and injected; a context without any
//! store gets `None` and works from in-memory defaults.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A key-value store holding plain structured values.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}
