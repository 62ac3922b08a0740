//! Application layer for the personalizer.
//!
//! This crate wires the store from `personalizer-infrastructure` into the
//! execution contexts of the extension: the background service that owns
//! state changes, the runtime channel other contexts use to reach it, the
//! registry that relays broadcasts, and the per-context view session.

pub mod background;
pub mod broadcast;
pub mod client;
pub mod context;
pub mod session;
pub mod shortcuts;

pub use background::{BackgroundService, InstallReason};
pub use broadcast::{ContextHandle, ContextRegistry};
pub use client::{RequestReceiver, RequestSender, RuntimeClient, RuntimeRequest, runtime_channel};
pub use context::{ContextId, ContextKind};
pub use session::ContextSession;
pub use shortcuts::ShortcutCommand;
