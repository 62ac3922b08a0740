//! Domain model for the chat personalizer.
//!
//! This crate defines the persisted state schema and its defaults, the
//! runtime message protocol spoken between execution contexts, and the
//! seams (`KeyValueBackend`, `EventBus`) the other crates plug into.
//! Nothing in here performs I/O.

pub mod backend;
pub mod bus;
pub mod config;
pub mod error;
pub mod message;
pub mod persona;
pub mod state;
pub mod theme;

// Re-export common error type
pub use error::PersonalizerError;

/// Current time as milliseconds since the Unix epoch.
///
/// All persisted timestamps (history entries, theme metadata) use this unit.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
