//! A context's local view of the state.
//!
//! Popup, options and page contexts keep the last state they fetched and
//! re-fetch it when a broadcast says something changed. The view may be stale
//! between a change and the next [`ContextSession::drain_inbox`].

use std::collections::BTreeMap;

use personalizer_core::message::{RuntimeMessage, RuntimeResponse};
use personalizer_core::persona::Persona;
use personalizer_core::state::PersistedState;
use personalizer_core::theme::{ThemePalette, theme_variables};

use crate::broadcast::{ContextHandle, ContextRegistry};
use crate::client::RuntimeClient;
use crate::context::ContextKind;

pub struct ContextSession {
    client: RuntimeClient,
    context: ContextHandle,
    state: Option<PersistedState>,
    overlay_visible: bool,
}

impl ContextSession {
    /// Registers a context of `kind` and returns its session.
    ///
    /// The session starts empty; call [`ContextSession::refresh`] to load.
    pub fn open(registry: &ContextRegistry, kind: ContextKind, client: RuntimeClient) -> Self {
        Self {
            client,
            context: registry.register(kind),
            state: None,
            overlay_visible: false,
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.context.kind()
    }

    /// Last state fetched, if any.
    pub fn state(&self) -> Option<&PersistedState> {
        self.state.as_ref()
    }

    pub fn active_persona(&self) -> Option<&Persona> {
        self.state.as_ref()?.active_persona()
    }

    pub fn active_theme(&self) -> Option<&ThemePalette> {
        self.state.as_ref()?.active_theme()
    }

    /// CSS variables for the active theme; empty before the first refresh.
    pub fn theme_variables(&self) -> BTreeMap<String, String> {
        self.active_theme().map(theme_variables).unwrap_or_default()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Re-fetches the state from the background.
    ///
    /// On failure the previous view is kept.
    pub async fn refresh(&mut self) -> Option<&PersistedState> {
        let response = self.client.send(&RuntimeMessage::GetState).await;
        self.accept(&response, "GET_STATE");
        self.state.as_ref()
    }

    /// Asks the background to switch personas and adopts the returned state.
    pub async fn select_persona(&mut self, persona_id: &str) -> RuntimeResponse {
        let response = self
            .client
            .send(&RuntimeMessage::SetActivePersona {
                persona_id: persona_id.to_string(),
            })
            .await;
        self.accept(&response, "SET_ACTIVE_PERSONA");
        response
    }

    /// Asks the background to relay a message to every other context.
    pub async fn send(&self, message: &RuntimeMessage) -> RuntimeResponse {
        self.client.send(message).await
    }

    /// Applies every pending broadcast. Returns how many were processed.
    ///
    /// Several reloads in a row cause a single re-fetch.
    pub async fn drain_inbox(&mut self) -> usize {
        let mut processed = 0;
        let mut reload = false;

        while let Some(message) = self.context.try_recv() {
            processed += 1;
            reload |= self.apply(message);
        }

        if reload {
            self.refresh().await;
        }
        processed
    }

    /// Waits for one broadcast and applies it. Returns `false` once the
    /// registry is gone.
    pub async fn process_next(&mut self) -> bool {
        let Some(message) = self.context.recv().await else {
            return false;
        };
        if self.apply(message) {
            self.refresh().await;
        }
        true
    }

    /// Returns true if the message asks for a re-fetch.
    fn apply(&mut self, message: RuntimeMessage) -> bool {
        match message {
            RuntimeMessage::ReloadThemes => true,
            RuntimeMessage::ToggleOverlay { visible } => {
                self.overlay_visible = visible.unwrap_or(!self.overlay_visible);
                tracing::debug!(
                    context = %self.kind(),
                    visible = self.overlay_visible,
                    "Overlay toggled"
                );
                false
            }
            other => {
                tracing::debug!(
                    context = %self.kind(),
                    message = other.kind(),
                    "Ignoring broadcast"
                );
                false
            }
        }
    }

    fn accept(&mut self, response: &RuntimeResponse, request: &str) {
        match (&response.state, response.error_code()) {
            (Some(state), _) => self.state = Some(state.clone()),
            (None, Some(code)) => {
                tracing::warn!(context = %self.kind(), request, error = code, "Request failed");
            }
            (None, None) => {}
        }
    }
}

impl std::fmt::Debug for ContextSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSession")
            .field("context", &self.context)
            .field("loaded", &self.state.is_some())
            .field("overlay_visible", &self.overlay_visible)
            .finish()
    }
}
