//! Canonical default state.

use std::collections::BTreeMap;

use super::model::{PersistedState, STORAGE_VERSION, StateFlags};
use crate::persona::{self, DEFAULT_PERSONA_ID};
use crate::theme;

/// Builds the default record for a fresh installation.
///
/// Themes and personas come from the preset tables, the first preset persona
/// is active, history is empty and flags are at their baseline. Every call
/// returns independently owned data; theme metadata is stamped with the
/// current time.
pub fn create_default() -> PersistedState {
    let now = crate::now_millis();

    PersistedState {
        version: STORAGE_VERSION,
        active_persona_id: Some(DEFAULT_PERSONA_ID.to_string()),
        themes: theme::get_default_presets(now)
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect(),
        personas: persona::get_default_presets()
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect(),
        history: Vec::new(),
        flags: StateFlags::default(),
        extra: BTreeMap::new(),
    }
}
