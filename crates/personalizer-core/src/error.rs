//! Error types for the personalizer.
//!
//! Reads and writes of the persisted state swallow these errors and fall back
//! to defaults; they surface from configuration loading and from
//! background-side validation.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PersonalizerError {
    /// A persona (or other keyed entity) that the caller named does not exist.
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    #[error("IO error: {message}")]
    Io { message: String },

    /// The key-value storage area refused a read or write.
    #[error("Backend error: {0}")]
    Backend(String),

    /// `format` is "JSON" or "TOML".
    #[error("Could not decode {format}: {message}")]
    Serialization { format: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PersonalizerError {
    pub fn not_found(entity_type: &str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    fn decode(format: &str, message: impl std::fmt::Display) -> Self {
        Self::Serialization {
            format: format.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<std::io::Error> for PersonalizerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PersonalizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode("JSON", err)
    }
}

impl From<toml::de::Error> for PersonalizerError {
    fn from(err: toml::de::Error) -> Self {
        Self::decode("TOML", err)
    }
}

impl From<toml::ser::Error> for PersonalizerError {
    fn from(err: toml::ser::Error) -> Self {
        Self::decode("TOML", err)
    }
}

pub type Result<T> = std::result::Result<T, PersonalizerError>;
