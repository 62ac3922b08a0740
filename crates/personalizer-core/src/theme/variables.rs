//! CSS custom-property mapping for theme palettes.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::model::ThemePalette;

/// Prefix of every custom property emitted by [`theme_variables`].
pub const THEME_VARIABLE_PREFIX: &str = "--codex";

/// Looks up a palette by id.
pub fn resolve_theme<'a>(
    themes: &'a IndexMap<String, ThemePalette>,
    theme_id: Option<&str>,
) -> Option<&'a ThemePalette> {
    theme_id.and_then(|id| themes.get(id))
}

/// Builds the custom-property map the view layer writes onto the page root.
///
/// Missing semantic colors fall back to the accent color; a missing blur is
/// `0px` and a missing opacity is `1`.
pub fn theme_variables(theme: &ThemePalette) -> BTreeMap<String, String> {
    let surfaces = &theme.surfaces;
    let accent = surfaces.accent.as_str();
    let entries = [
        ("bg", surfaces.background.clone()),
        ("fg", surfaces.foreground.clone()),
        ("accent", surfaces.accent.clone()),
        ("muted", surfaces.muted.clone()),
        ("success", surfaces.success.as_deref().unwrap_or(accent).to_string()),
        ("warning", surfaces.warning.as_deref().unwrap_or(accent).to_string()),
        ("danger", surfaces.danger.as_deref().unwrap_or(accent).to_string()),
        ("font-family", theme.typography.font_family.clone()),
        ("font-size", theme.typography.font_size.clone()),
        ("line-height", theme.typography.line_height.clone()),
        ("letter-spacing", theme.typography.letter_spacing.clone()),
        ("border-radius", theme.spacing.border_radius.clone()),
        ("gutter", theme.spacing.gutter.clone()),
        ("input-height", theme.spacing.input_height.clone()),
        ("sidebar-width", theme.spacing.sidebar_width.clone()),
        ("background-type", theme.background.kind.as_str().to_string()),
        ("background-value", theme.background.value.clone()),
        (
            "background-blur",
            format!("{}px", theme.background.blur.unwrap_or(0.0)),
        ),
        (
            "background-opacity",
            theme.background.opacity.unwrap_or(1.0).to_string(),
        ),
    ];

    entries
        .into_iter()
        .map(|(name, value)| (format!("{}-{}", THEME_VARIABLE_PREFIX, name), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::get_default_presets;

    #[test]
    fn test_variables_for_preset() {
        let presets = get_default_presets(0);
        let creator = presets.iter().find(|t| t.id == "creator-neon").unwrap();
        let vars = theme_variables(creator);

        assert_eq!(vars.len(), 19);
        assert_eq!(vars["--codex-accent"], "#f472b6");
        assert_eq!(vars["--codex-border-radius"], "24px");
        assert_eq!(vars["--codex-background-type"], "gradient");
        assert_eq!(vars["--codex-background-blur"], "8px");
        assert_eq!(vars["--codex-background-opacity"], "0.95");
    }

    #[test]
    fn test_missing_optional_values_fall_back() {
        let mut theme = get_default_presets(0).remove(0);
        theme.surfaces.success = None;
        theme.surfaces.danger = None;
        theme.background.blur = None;
        theme.background.opacity = None;

        let vars = theme_variables(&theme);
        assert_eq!(vars["--codex-success"], theme.surfaces.accent);
        assert_eq!(vars["--codex-danger"], theme.surfaces.accent);
        assert_eq!(vars["--codex-background-blur"], "0px");
        assert_eq!(vars["--codex-background-opacity"], "1");
    }

    #[test]
    fn test_resolve_theme() {
        let themes: IndexMap<_, _> = get_default_presets(0)
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        assert!(resolve_theme(&themes, Some("creator-neon")).is_some());
        assert!(resolve_theme(&themes, Some("missing")).is_none());
        assert!(resolve_theme(&themes, None).is_none());
    }
}
