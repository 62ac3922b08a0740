//! Execution contexts of the extension.

use std::fmt;

use uuid::Uuid;

/// Where a piece of the extension runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// The background worker; sole writer of the active persona.
    Background,
    Popup,
    Options,
    /// A script injected into a chat tab.
    Page { tab_id: u32 },
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Background => write!(f, "background"),
            ContextKind::Popup => write!(f, "popup"),
            ContextKind::Options => write!(f, "options"),
            ContextKind::Page { tab_id } => write!(f, "page:{}", tab_id),
        }
    }
}

/// Identifies one registration in a [`crate::ContextRegistry`].
///
/// Two tabs reloading the same page get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
