//! Persona domain model.
//!
//! A persona bundles a theme with conversational preferences. Switching the
//! active persona is what restyles the chat client.

use serde::{Deserialize, Serialize};

/// A persona the user can switch to.
///
/// `theme_id` is allowed to dangle: the view layer falls back to the default
/// palette when the referenced theme has been removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Stable unique identifier
    pub id: String,
    /// Display name of the persona
    pub name: String,
    /// ID of the palette applied while this persona is active
    pub theme_id: String,
    /// Tone instruction prepended to prompts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_prefix: Option<String>,
    /// Preferred voice label for voice input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_voice: Option<String>,
    /// Keyboard shortcut label shown in the UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_are_omitted() {
        let persona = Persona {
            id: "minimal".to_string(),
            name: "Minimal".to_string(),
            theme_id: "focus-minimal".to_string(),
            prompt_prefix: None,
            default_voice: None,
            shortcut: None,
        };

        let value = serde_json::to_value(&persona).unwrap();
        assert_eq!(
            value,
            json!({ "id": "minimal", "name": "Minimal", "themeId": "focus-minimal" })
        );
    }
}
