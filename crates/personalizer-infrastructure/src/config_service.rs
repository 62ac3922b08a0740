//! Configuration service implementation.
//!
//! Loads [`PersonalizerConfig`] from `config.toml` and caches it until
//! explicitly invalidated.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use personalizer_core::config::PersonalizerConfig;
use personalizer_core::error::{PersonalizerError, Result};

use crate::paths::PersonalizerPaths;

/// Configuration service that loads and caches the root configuration.
///
/// The cache belongs to this instance; call [`ConfigService::invalidate_cache`]
/// after editing the file to pick up the change.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<PersonalizerConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform `config.toml`.
    pub fn new() -> Self {
        let path = PersonalizerPaths::config_file()
            .map_err(|e| tracing::warn!("Config path unavailable, using defaults: {}", e))
            .ok();
        Self::from_optional_path(path)
    }

    /// Creates a service reading the given file.
    pub fn with_path(path: PathBuf) -> Self {
        Self::from_optional_path(Some(path))
    }

    /// The file this service reads, if a config location is known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn from_optional_path(path: Option<PathBuf>) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults; an unreadable or invalid file is
    /// logged and also yields the defaults.
    pub fn get_config(&self) -> PersonalizerConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = match self.path.as_deref() {
            Some(path) => Self::load_config(path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "Failed to load config, using defaults: {}", e);
                PersonalizerConfig::default()
            }),
            None => PersonalizerConfig::default(),
        };

        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_config(path: &Path) -> Result<PersonalizerConfig> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(PersonalizerConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: PersonalizerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Writes `config` to the configured file and refreshes the cache.
    pub fn save_config(&self, config: &PersonalizerConfig) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| PersonalizerError::config("No config path available"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(config)?)?;

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(config.clone());
        Ok(())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personalizer_core::config::BackendKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.get_config(), PersonalizerConfig::default());
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[storage\nbackend = ").unwrap();

        let service = ConfigService::with_path(path);
        assert_eq!(service.get_config(), PersonalizerConfig::default());
    }

    #[test]
    fn test_cache_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nbackend = \"memory\"\n").unwrap();

        let service = ConfigService::with_path(path.clone());
        assert_eq!(service.get_config().storage.backend, BackendKind::Memory);

        std::fs::write(&path, "[storage]\nbackend = \"none\"\n").unwrap();
        assert_eq!(service.get_config().storage.backend, BackendKind::Memory);

        service.invalidate_cache();
        assert_eq!(service.get_config().storage.backend, BackendKind::None);
    }

    #[test]
    fn test_save_config_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");
        let service = ConfigService::with_path(path.clone());

        let mut config = PersonalizerConfig::default();
        config.storage.backend = BackendKind::None;
        config.logging.level = "debug".to_string();
        service.save_config(&config).unwrap();

        let fresh = ConfigService::with_path(path);
        assert_eq!(fresh.get_config(), config);
    }
}
