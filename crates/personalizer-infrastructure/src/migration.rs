//! Repair-forward migration of the persisted state.
//!
//! Whatever a previous version (or a corrupted write) left in the backend is
//! turned into a valid current-schema [`PersistedState`]. Migration never
//! fails:
//!
//! 1. An absent, `null` or non-object value becomes the default state.
//! 2. Each known field of the candidate is decoded over a fresh default. A
//!    field that does not decode keeps its default; undecodable map or list
//!    entries are dropped one by one.
//! 3. Empty `themes` are replaced with the preset themes.
//! 4. Empty `personas` are replaced with the preset personas.
//! 5. An `activePersonaId` that is unset or does not key into `personas`
//!    is reset to the default persona.
//! 6. `version` is stamped to [`STORAGE_VERSION`].
//! 7. `history` is cut down to the most recent [`HISTORY_LIMIT`] entries.
//!
//! Top-level fields this version does not know are carried over untouched,
//! and map entries keep the order they were stored in.
//!
//! Both entry points are idempotent.

use indexmap::IndexMap;
use personalizer_core::persona::{self, DEFAULT_PERSONA_ID, Persona};
use personalizer_core::state::{
    HISTORY_LIMIT, HistoryEntry, PersistedState, STORAGE_VERSION, StateFlags, create_default,
};
use personalizer_core::theme::{self, ThemePalette};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Migrates an untyped candidate read from the backend.
pub fn migrate(candidate: Option<&Value>) -> PersistedState {
    let fields = match candidate {
        None | Some(Value::Null) => {
            tracing::debug!("No persisted state, using defaults");
            return create_default();
        }
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            tracing::warn!(
                kind = value_kind(other),
                "Persisted state is not an object, using defaults"
            );
            return create_default();
        }
    };

    migrate_state(overlay(fields))
}

/// Applies the repair steps to an already typed state.
pub fn migrate_state(mut state: PersistedState) -> PersistedState {
    if state.themes.is_empty() {
        tracing::debug!("Theme map empty, restoring preset themes");
        state.themes = default_themes();
    }

    if state.personas.is_empty() {
        tracing::debug!("Persona map empty, restoring preset personas");
        state.personas = default_personas();
    }

    let active_resolves = state
        .active_persona_id
        .as_deref()
        .is_some_and(|id| state.personas.contains_key(id));
    if !active_resolves {
        tracing::debug!(
            active_persona_id = ?state.active_persona_id,
            "Active persona does not resolve, resetting to {}",
            DEFAULT_PERSONA_ID
        );
        state.active_persona_id = Some(DEFAULT_PERSONA_ID.to_string());
        // The default persona may itself have been deleted from a non-empty map.
        if !state.personas.contains_key(DEFAULT_PERSONA_ID) {
            if let Some(preset) = persona::get_default_presets()
                .into_iter()
                .find(|p| p.id == DEFAULT_PERSONA_ID)
            {
                state.personas.insert(preset.id.clone(), preset);
            }
        }
    }

    if state.version != STORAGE_VERSION {
        tracing::debug!(
            from = state.version,
            to = STORAGE_VERSION,
            "Stamping schema version"
        );
        state.version = STORAGE_VERSION;
    }

    if state.history.len() > HISTORY_LIMIT {
        tracing::debug!(
            len = state.history.len(),
            "Truncating history to {} entries",
            HISTORY_LIMIT
        );
        state.truncate_history();
    }

    state
}

/// Decodes each known field of `fields` over a fresh default.
///
/// Unknown fields land in [`PersistedState::extra`].
fn overlay(fields: &Map<String, Value>) -> PersistedState {
    let mut state = create_default();

    for (name, value) in fields {
        match name.as_str() {
            "version" => {
                if let Some(version) = decode_field::<u32>(name, value) {
                    state.version = version;
                }
            }
            "activePersonaId" => {
                state.active_persona_id = value.as_str().map(str::to_string);
            }
            "themes" => state.themes = decode_entries::<ThemePalette>(value, "theme"),
            "personas" => state.personas = decode_entries::<Persona>(value, "persona"),
            "history" => state.history = decode_history(value),
            "flags" => {
                if let Some(flags) = decode_field::<StateFlags>(name, value) {
                    state.flags = flags;
                }
            }
            _ => {
                tracing::trace!(field = %name, "Keeping unknown field");
                state.extra.insert(name.clone(), value.clone());
            }
        }
    }

    state
}

fn decode_field<T: DeserializeOwned>(name: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(field = name, error = %e, "Discarding undecodable field");
            None
        }
    }
}

/// Decodes an id-keyed map, dropping entries that do not decode.
///
/// Anything other than an object yields an empty map, which the repair steps
/// then replace with presets.
fn decode_entries<T: DeserializeOwned>(value: &Value, entity: &str) -> IndexMap<String, T> {
    let Value::Object(entries) = value else {
        return IndexMap::new();
    };

    entries
        .iter()
        .filter_map(|(id, raw)| match serde_json::from_value::<T>(raw.clone()) {
            Ok(decoded) => Some((id.clone(), decoded)),
            Err(e) => {
                tracing::warn!(entity, id = %id, error = %e, "Dropping undecodable entry");
                None
            }
        })
        .collect()
}

fn decode_history(value: &Value) -> Vec<HistoryEntry> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|raw| serde_json::from_value::<HistoryEntry>(raw.clone()).ok())
        .collect()
}

fn default_themes() -> IndexMap<String, ThemePalette> {
    theme::get_default_presets(personalizer_core::now_millis())
        .into_iter()
        .map(|t| (t.id.clone(), t))
        .collect()
}

fn default_personas() -> IndexMap<String, Persona> {
    persona::get_default_presets()
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Compares two states ignoring theme timestamps.
    fn without_timestamps(mut state: PersistedState) -> PersistedState {
        for theme in state.themes.values_mut() {
            theme.metadata = None;
        }
        state
    }

    fn remigrate(state: &PersistedState) -> PersistedState {
        let value = serde_json::to_value(state).unwrap();
        migrate(Some(&value))
    }

    #[test]
    fn test_absent_and_null_yield_defaults() {
        let expected = without_timestamps(create_default());
        assert_eq!(without_timestamps(migrate(None)), expected);
        assert_eq!(without_timestamps(migrate(Some(&Value::Null))), expected);
    }

    #[test]
    fn test_non_object_yields_defaults() {
        let expected = without_timestamps(create_default());
        for raw in [json!(42), json!("state"), json!([1, 2, 3]), json!(true)] {
            assert_eq!(without_timestamps(migrate(Some(&raw))), expected);
        }
    }

    #[test]
    fn test_missing_fields_are_filled() {
        let state = migrate(Some(&json!({ "activePersonaId": "creator" })));
        assert_eq!(state.active_persona_id.as_deref(), Some("creator"));
        assert_eq!(state.personas.len(), 3);
        assert_eq!(state.themes.len(), 3);
        assert!(state.history.is_empty());
        assert_eq!(state.version, STORAGE_VERSION);
    }

    #[test]
    fn test_empty_personas_restore_presets() {
        let state = migrate(Some(&json!({
            "personas": {},
            "themes": {},
            "activePersonaId": "creator"
        })));

        assert_eq!(state.personas, create_default().personas);
        assert_eq!(state.themes.len(), 3);
        assert_eq!(state.active_persona_id.as_deref(), Some("creator"));
    }

    #[test]
    fn test_dangling_active_persona_resets() {
        let state = migrate(Some(&json!({
            "activePersonaId": "ghost",
            "personas": {
                "solo": { "id": "solo", "name": "Solo", "themeId": "focus-minimal" }
            }
        })));

        assert_eq!(state.active_persona_id.as_deref(), Some(DEFAULT_PERSONA_ID));
        assert!(state.personas.contains_key(DEFAULT_PERSONA_ID));
        assert!(state.personas.contains_key("solo"));
    }

    #[test]
    fn test_theme_id_as_active_persona_is_invalid() {
        let state = migrate(Some(&json!({ "activePersonaId": "creator-neon" })));
        assert_eq!(state.active_persona_id.as_deref(), Some(DEFAULT_PERSONA_ID));
    }

    #[test]
    fn test_null_active_persona_resets() {
        let state = migrate(Some(&json!({ "activePersonaId": null })));
        assert_eq!(state.active_persona_id.as_deref(), Some(DEFAULT_PERSONA_ID));
    }

    #[test]
    fn test_version_is_stamped() {
        for version in [json!(0), json!(7), json!("1"), json!(null)] {
            let state = migrate(Some(&json!({ "version": version })));
            assert_eq!(state.version, STORAGE_VERSION);
        }
    }

    #[test]
    fn test_history_keeps_most_recent_tail() {
        let history: Vec<_> = (0..80)
            .map(|i| json!({ "timestamp": i, "personaId": format!("p{}", i) }))
            .collect();
        let state = migrate(Some(&json!({ "history": history })));

        assert_eq!(state.history.len(), HISTORY_LIMIT);
        assert_eq!(state.history[0].persona_id, "p30");
        assert_eq!(state.history[HISTORY_LIMIT - 1].persona_id, "p79");
    }

    #[test]
    fn test_corrupt_entries_are_dropped() {
        let state = migrate(Some(&json!({
            "personas": {
                "creator": { "id": "creator", "name": "Creator", "themeId": "creator-neon" },
                "broken": { "name": 12 }
            },
            "history": [
                { "timestamp": 1, "personaId": "creator" },
                { "timestamp": "yesterday" },
                "garbage"
            ],
            "flags": "not-an-object"
        })));

        assert_eq!(state.personas.len(), 2);
        assert!(state.personas.contains_key("creator"));
        assert!(!state.personas.contains_key("broken"));
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.flags, StateFlags::default());
    }

    #[test]
    fn test_dangling_theme_reference_is_kept() {
        let state = migrate(Some(&json!({
            "personas": {
                "night": { "id": "night", "name": "Night", "themeId": "gone" }
            },
            "activePersonaId": "night"
        })));

        assert_eq!(state.active_persona_id.as_deref(), Some("night"));
        assert_eq!(state.personas["night"].theme_id, "gone");
    }

    #[test]
    fn test_idempotent() {
        let long_history: Vec<_> = (0..70)
            .map(|i| json!({ "timestamp": i, "personaId": "night" }))
            .collect();
        let candidates = [
            Value::Null,
            json!({}),
            json!({ "activePersonaId": "ghost", "personas": {} }),
            json!({
                "version": 0,
                "activePersonaId": "night",
                "personas": { "night": { "id": "night", "name": "Night", "themeId": "gone" } },
                "history": long_history,
                "flags": { "onboardingComplete": true, "beta": ["x"] }
            }),
        ];

        for candidate in candidates {
            let once = migrate(Some(&candidate));
            let twice = remigrate(&once);
            assert_eq!(once, twice, "not idempotent for {candidate}");
            assert_eq!(migrate_state(once.clone()), once);
        }
    }

    #[test]
    fn test_migrate_state_repairs_typed_input() {
        let mut state = create_default();
        state.personas.clear();
        state.active_persona_id = Some("ghost".to_string());
        state.version = 0;
        for i in 0..55 {
            state.push_history("creator", i);
        }
        state.history.extend((0..5).map(|i| HistoryEntry {
            timestamp: 100 + i,
            persona_id: "creator".to_string(),
        }));

        let repaired = migrate_state(state);
        assert_eq!(repaired.personas.len(), 3);
        assert_eq!(repaired.active_persona_id.as_deref(), Some(DEFAULT_PERSONA_ID));
        assert_eq!(repaired.version, STORAGE_VERSION);
        assert_eq!(repaired.history.len(), HISTORY_LIMIT);
        assert_eq!(repaired.history.last().unwrap().timestamp, 104);
    }

    #[test]
    fn test_unknown_fields_survive_migration() {
        let state = migrate(Some(&json!({
            "version": 1,
            "activePersonaId": "creator",
            "customOrder": ["creator"],
            "sync": { "enabled": false }
        })));

        assert_eq!(state.active_persona_id.as_deref(), Some("creator"));
        assert_eq!(state.extra["customOrder"], json!(["creator"]));
        assert_eq!(state.extra["sync"], json!({ "enabled": false }));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["customOrder"], json!(["creator"]));
        assert_eq!(remigrate(&state), state);
    }

    #[test]
    fn test_stored_persona_order_is_kept() {
        let state = migrate(Some(&json!({
            "personas": {
                "zeta": { "id": "zeta", "name": "Zeta", "themeId": "focus-minimal" },
                "alpha": { "id": "alpha", "name": "Alpha", "themeId": "focus-minimal" },
                "productive-pro": {
                    "id": "productive-pro",
                    "name": "Productive Pro",
                    "themeId": "focus-minimal"
                }
            },
            "activePersonaId": "alpha"
        })));

        let ids: Vec<_> = state.personas.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "productive-pro"]);

        let value = serde_json::to_value(&state).unwrap();
        let stored: Vec<_> = value["personas"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_unknown_theme_enum_values_keep_the_theme() {
        let mut raw = serde_json::to_value(create_default()).unwrap();
        raw["themes"]["creator-neon"]["voice"]["visualizerStyle"] = json!("orb");
        raw["themes"]["creator-neon"]["voice"]["micPosition"] = json!("top-center");
        raw["themes"]["creator-neon"]["background"]["type"] = json!("video");

        let state = migrate(Some(&raw));
        assert!(state.themes.contains_key("creator-neon"));

        let value = serde_json::to_value(&state).unwrap();
        let voice = &value["themes"]["creator-neon"]["voice"];
        assert_eq!(voice["visualizerStyle"], "orb");
        assert_eq!(voice["micPosition"], "top-center");
        assert_eq!(value["themes"]["creator-neon"]["background"]["type"], "video");
    }
}
