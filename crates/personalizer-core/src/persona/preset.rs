//! Default persona presets.

use super::model::Persona;

/// ID of the persona that is active on a fresh install and after repairs.
pub const DEFAULT_PERSONA_ID: &str = "productive-pro";

/// Returns the shipped persona configurations.
///
/// - **Productive Pro**: concise and pragmatic, Focus Minimal theme
/// - **Creator**: playful and visual, Creator Neon theme
/// - **Accessibility Ally**: plain language, high contrast theme
pub fn get_default_presets() -> Vec<Persona> {
    vec![
        Persona {
            id: DEFAULT_PERSONA_ID.to_string(),
            name: "Productive Pro".to_string(),
            theme_id: crate::theme::DEFAULT_THEME_ID.to_string(),
            prompt_prefix: Some(
                "You are a concise and pragmatic assistant focused on productivity.".to_string(),
            ),
            default_voice: None,
            shortcut: Some("Alt+Shift+1".to_string()),
        },
        Persona {
            id: "creator".to_string(),
            name: "Creator".to_string(),
            theme_id: "creator-neon".to_string(),
            prompt_prefix: Some(
                "Respond with a playful, visually imaginative tone and include ideas for multimedia presentation when relevant."
                    .to_string(),
            ),
            default_voice: Some("alloy".to_string()),
            shortcut: Some("Alt+Shift+2".to_string()),
        },
        Persona {
            id: "accessibility-ally".to_string(),
            name: "Accessibility Ally".to_string(),
            theme_id: "accessibility-high-contrast".to_string(),
            prompt_prefix: Some(
                "Favor plain language explanations, list formatting, and highlight accessibility callouts when applicable."
                    .to_string(),
            ),
            default_voice: Some("verse".to_string()),
            shortcut: Some("Alt+Shift+3".to_string()),
        },
    ]
}
