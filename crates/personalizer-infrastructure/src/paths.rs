//! Unified path management for personalizer files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/personalizer/        # Config directory
//! └── config.toml                # Runtime configuration
//!
//! ~/.local/share/personalizer/   # Data directory
//! └── state.json                 # Key-value file holding the persisted state
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "personalizer";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
    /// Platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves the personalizer's files on the current platform.
pub struct PersonalizerPaths;

impl PersonalizerPaths {
    /// Returns the configuration directory (e.g., `~/.config/personalizer/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the data directory (e.g., `~/.local/share/personalizer/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path of the default state file.
    pub fn state_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("state.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        if let Ok(path) = PersonalizerPaths::config_file() {
            assert!(path.ends_with("personalizer/config.toml"));
        }
        if let Ok(path) = PersonalizerPaths::state_file() {
            assert!(path.ends_with("personalizer/state.json"));
        }
    }
}
