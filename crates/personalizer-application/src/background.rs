//! Background service.
//!
//! The background context is the only one that changes the active persona.
//! Other contexts send it [`RuntimeMessage`]s over the runtime channel; it
//! applies the change through the store and tells every other context to
//! re-read.

use personalizer_core::PersonalizerError;
use personalizer_core::error::Result;
use personalizer_core::message::{RuntimeMessage, RuntimeResponse, error_codes};
use personalizer_core::now_millis;
use personalizer_core::persona::{CycleDirection, next_in_cycle};
use personalizer_core::state::{PersistedState, create_default};
use personalizer_infrastructure::StateStore;
use serde_json::Value;

use crate::broadcast::{ContextHandle, ContextRegistry};
use crate::client::RequestReceiver;
use crate::context::ContextKind;
use crate::shortcuts::ShortcutCommand;

/// Why the extension lifecycle hook fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    /// First install: any existing state is replaced by defaults.
    Install,
    /// Browser or extension update: existing state is kept and re-persisted.
    Update,
}

pub struct BackgroundService {
    store: StateStore,
    registry: ContextRegistry,
    context: ContextHandle,
}

impl BackgroundService {
    /// Creates the service and registers the background context.
    pub fn new(store: StateStore, registry: ContextRegistry) -> Self {
        let context = registry.register(ContextKind::Background);
        Self {
            store,
            registry,
            context,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn registry(&self) -> &ContextRegistry {
        &self.registry
    }

    /// Answers a raw request. Anything that is not a known message is
    /// `unknown_message`.
    pub async fn handle_value(&self, raw: &Value) -> RuntimeResponse {
        match RuntimeMessage::from_value(raw) {
            Some(message) => self.handle(message).await,
            None => {
                tracing::debug!(payload = %raw, "Unknown runtime message");
                RuntimeResponse::error(error_codes::UNKNOWN_MESSAGE)
            }
        }
    }

    pub async fn handle(&self, message: RuntimeMessage) -> RuntimeResponse {
        tracing::debug!(message = message.kind(), "Handling runtime message");

        match message {
            RuntimeMessage::GetState => RuntimeResponse::with_state(self.store.read().await),
            RuntimeMessage::SetActivePersona { persona_id } => {
                match self.set_active_persona(&persona_id).await {
                    Ok(state) => RuntimeResponse::with_state(state),
                    Err(e) if e.is_not_found() => {
                        tracing::info!("Rejected persona change: {}", e);
                        RuntimeResponse::error(error_codes::PERSONA_NOT_FOUND)
                    }
                    Err(e) => {
                        tracing::warn!("Persona change failed: {}", e);
                        RuntimeResponse::error(error_codes::MESSAGE_FAILED)
                    }
                }
            }
            message @ (RuntimeMessage::ToggleOverlay { .. } | RuntimeMessage::ReloadThemes) => {
                self.relay(&message);
                RuntimeResponse::ok()
            }
            RuntimeMessage::Ping => RuntimeResponse::ok(),
        }
    }

    /// Makes `persona_id` active, records it in the history and asks every
    /// other context to reload.
    ///
    /// Fails with `NotFound` if the persona does not exist; the store is not
    /// touched in that case.
    pub async fn set_active_persona(&self, persona_id: &str) -> Result<PersistedState> {
        if !self.store.read().await.has_persona(persona_id) {
            return Err(PersonalizerError::not_found("persona", persona_id));
        }

        let id = persona_id.to_string();
        let next = self
            .store
            .update(move |mut state| {
                state.active_persona_id = Some(id.clone());
                state.push_history(id, now_millis());
                state
            })
            .await;

        tracing::info!(persona = persona_id, "Active persona changed");
        self.relay(&RuntimeMessage::ReloadThemes);
        Ok(next)
    }

    /// Activates the persona one step away from the active one.
    ///
    /// Returns `None` if there is nothing to cycle to.
    pub async fn cycle_persona(&self, direction: CycleDirection) -> Option<PersistedState> {
        let state = self.store.read().await;
        let target = next_in_cycle(
            &state.personas,
            state.active_persona_id.as_deref(),
            direction,
        )?
        .id
        .clone();

        self.set_active_persona(&target).await.ok()
    }

    /// Replaces the stored state with defaults and asks every context to reload.
    pub async fn reset_to_defaults(&self) -> PersistedState {
        let state = self.store.update(|_| create_default()).await;
        tracing::info!("Personalization state reset to defaults");
        self.relay(&RuntimeMessage::ReloadThemes);
        state
    }

    /// Lifecycle hook run when the extension is installed or updated.
    pub async fn on_installed(&self, reason: InstallReason) -> PersistedState {
        let state = match reason {
            InstallReason::Install => create_default(),
            InstallReason::Update => self.store.read().await,
        };
        self.store.write(&state).await;
        tracing::info!(reason = ?reason, "Personalization state initialized");
        state
    }

    /// Runs a keyboard command. Unknown command names are ignored.
    ///
    /// Returns the new state when the command changed the active persona.
    pub async fn on_command(&self, name: &str) -> Option<PersistedState> {
        let command = match name.parse::<ShortcutCommand>() {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!("Ignoring {}", e);
                return None;
            }
        };

        match command.cycle_direction() {
            Some(direction) => self.cycle_persona(direction).await,
            None => {
                self.relay(&RuntimeMessage::ToggleOverlay { visible: None });
                None
            }
        }
    }

    /// Answers requests until every sender is gone.
    ///
    /// Requests are handled one at a time in arrival order.
    pub async fn serve(&self, mut requests: RequestReceiver) {
        tracing::info!("Background service listening");

        while let Some(request) = requests.recv().await {
            let sender = request
                .sender
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let response = self.handle_value(&request.payload).await;
            if request.reply.send(response).is_err() {
                tracing::debug!(sender = %sender, "Requester went away before the reply");
            }
        }

        tracing::info!("Runtime channel closed");
    }

    fn relay(&self, message: &RuntimeMessage) -> usize {
        self.registry.broadcast(message, Some(self.context.id()))
    }
}
