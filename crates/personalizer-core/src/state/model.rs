//! Persisted state domain models.
//!
//! `PersistedState` is the single record kept in the key-value backend under
//! [`STORAGE_KEY`]. Every execution context reads it on startup and after each
//! reload broadcast.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::persona::Persona;
use crate::theme::{DEFAULT_THEME_ID, ThemePalette, resolve_theme};

/// Backend key under which the whole record is stored.
pub const STORAGE_KEY: &str = "codexState";

/// Current schema version of [`PersistedState`].
pub const STORAGE_VERSION: u32 = 1;

/// Maximum number of history entries kept (most recent last).
pub const HISTORY_LIMIT: usize = 50;

/// One persona activation.
///
/// `persona_id` is a historical record and is not required to still exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Activation time (milliseconds since epoch)
    pub timestamp: i64,
    pub persona_id: String,
}

/// Feature flags.
///
/// Flags this version does not know about are kept verbatim in `extra` so a
/// newer writer's flags survive a round trip through an older reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StateFlags {
    #[serde(default)]
    pub onboarding_complete: bool,
    #[serde(default)]
    pub experimental_features: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StateFlags {
    /// Returns true if the named experimental feature is switched on.
    pub fn has_experiment(&self, name: &str) -> bool {
        self.experimental_features.iter().any(|f| f == name)
    }
}

/// The root persisted record.
///
/// # Invariants (enforced by migration)
///
/// * `active_persona_id`, when set, keys into `personas`
/// * `themes` and `personas` are never empty
/// * `history` holds at most [`HISTORY_LIMIT`] entries, oldest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub version: u32,
    pub active_persona_id: Option<String>,
    /// Keyed by theme id, in insertion order.
    pub themes: IndexMap<String, ThemePalette>,
    /// Keyed by persona id, in insertion order (the shortcut cycling order).
    pub personas: IndexMap<String, Persona>,
    pub history: Vec<HistoryEntry>,
    pub flags: StateFlags,
    /// Top-level fields this version does not know, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PersistedState {
    /// Returns the active persona, if the id resolves.
    pub fn active_persona(&self) -> Option<&Persona> {
        self.active_persona_id
            .as_deref()
            .and_then(|id| self.personas.get(id))
    }

    /// Returns true if a persona with this id exists.
    pub fn has_persona(&self, persona_id: &str) -> bool {
        self.personas.contains_key(persona_id)
    }

    /// Resolves the palette for a persona.
    ///
    /// A dangling `theme_id` falls back to the default palette, and if that
    /// was removed too, to the first palette in the map.
    pub fn theme_for(&self, persona: &Persona) -> Option<&ThemePalette> {
        resolve_theme(&self.themes, Some(&persona.theme_id))
            .or_else(|| self.default_theme())
    }

    /// Palette of the active persona, or the default palette when no persona is active.
    pub fn active_theme(&self) -> Option<&ThemePalette> {
        match self.active_persona() {
            Some(persona) => self.theme_for(persona),
            None => self.default_theme(),
        }
    }

    fn default_theme(&self) -> Option<&ThemePalette> {
        resolve_theme(&self.themes, Some(DEFAULT_THEME_ID)).or_else(|| self.themes.values().next())
    }

    /// Appends a history entry, dropping the oldest beyond [`HISTORY_LIMIT`].
    pub fn push_history(&mut self, persona_id: impl Into<String>, timestamp: i64) {
        self.history.push(HistoryEntry {
            timestamp,
            persona_id: persona_id.into(),
        });
        self.truncate_history();
    }

    /// Keeps only the [`HISTORY_LIMIT`] most recent history entries.
    pub fn truncate_history(&mut self) {
        if self.history.len() > HISTORY_LIMIT {
            let overflow = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..overflow);
        }
    }
}
