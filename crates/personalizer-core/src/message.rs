//! Runtime message protocol.
//!
//! Contexts talk to the background context with a closed set of requests.
//! Requests are JSON objects tagged by `type`; responses are
//! `{ "ok": true, "state"?: ... }` or `{ "ok": false, "error": "<code>" }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::PersistedState;

/// Error codes carried in failed responses.
pub mod error_codes {
    /// `SET_ACTIVE_PERSONA` named a persona that does not exist.
    pub const PERSONA_NOT_FOUND: &str = "persona_not_found";
    /// The request kind (or its payload) was not recognized.
    pub const UNKNOWN_MESSAGE: &str = "unknown_message";
    /// The sending context has no runtime channel.
    pub const RUNTIME_UNAVAILABLE: &str = "runtime_unavailable";
    /// The channel failed while delivering the request.
    pub const MESSAGE_FAILED: &str = "message_failed";
}

/// A request sent between execution contexts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeMessage {
    /// Fetch the full current state.
    GetState,
    /// Make a persona active (background applies it, then broadcasts a reload).
    SetActivePersona {
        #[serde(rename = "personaId")]
        persona_id: String,
    },
    /// Show, hide or flip the overlay in page contexts.
    ToggleOverlay {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visible: Option<bool>,
    },
    /// Ask every context to re-read the state and re-render.
    ReloadThemes,
    /// Liveness check.
    Ping,
}

impl RuntimeMessage {
    /// Decodes a raw request. Unknown kinds and malformed payloads are `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Wire name of the request kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeMessage::GetState => "GET_STATE",
            RuntimeMessage::SetActivePersona { .. } => "SET_ACTIVE_PERSONA",
            RuntimeMessage::ToggleOverlay { .. } => "TOGGLE_OVERLAY",
            RuntimeMessage::ReloadThemes => "RELOAD_THEMES",
            RuntimeMessage::Ping => "PING",
        }
    }
}

/// Response to a [`RuntimeMessage`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PersistedState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuntimeResponse {
    /// `{ok: true}`
    pub fn ok() -> Self {
        Self {
            ok: true,
            state: None,
            error: None,
        }
    }

    /// `{ok: true, state}`
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            ok: true,
            state: Some(state),
            error: None,
        }
    }

    /// `{ok: false, error}`
    pub fn error(code: impl Into<String>) -> Self {
        Self {
            ok: false,
            state: None,
            error: Some(code.into()),
        }
    }

    /// Returns the error code of a failed response.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
