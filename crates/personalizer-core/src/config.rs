//! Runtime configuration model.
//!
//! Loaded from `config.toml` by the infrastructure crate. Every field has a
//! default so a missing or partial file still yields a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which key-value backend the store uses.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// JSON file on disk (shared by every process using the same path)
    #[default]
    File,
    /// Process-local map
    Memory,
    /// No backend: reads yield defaults, writes are dropped
    None,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// State file location; defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonalizerConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
