//! Default theme presets.
//!
//! Provides the palettes every installation starts with. Each call builds
//! fresh values, so callers are free to mutate what they get back.

use super::model::{
    BackgroundKind, MicPosition, ThemeBackground, ThemeMetadata, ThemePalette, ThemeSpacing,
    ThemeSurface, ThemeTypography, VisualizerStyle, VoiceStyle,
};

/// ID of the palette used when a persona points at a theme that no longer exists.
pub const DEFAULT_THEME_ID: &str = "focus-minimal";

fn preset_metadata(now: i64) -> Option<ThemeMetadata> {
    Some(ThemeMetadata {
        created_at: now,
        updated_at: now,
        preset: true,
    })
}

fn voice(visualizer_style: VisualizerStyle) -> VoiceStyle {
    VoiceStyle {
        visualizer_style,
        mic_position: MicPosition::BottomRight,
    }
}

/// Returns the shipped theme palettes, stamped with `now` (ms since epoch).
///
/// - **Focus Minimal**: dark slate with a blue gradient, bar visualizer
/// - **Creator Neon**: near-black with pink accents and a blurred violet gradient
/// - **Accessibility High Contrast**: white background, large legible type
pub fn get_default_presets(now: i64) -> Vec<ThemePalette> {
    vec![
        ThemePalette {
            id: DEFAULT_THEME_ID.to_string(),
            name: "Focus Minimal".to_string(),
            surfaces: ThemeSurface {
                background: "#0f172a".to_string(),
                foreground: "#f8fafc".to_string(),
                accent: "#38bdf8".to_string(),
                muted: "#1e293b".to_string(),
                success: Some("#34d399".to_string()),
                warning: Some("#facc15".to_string()),
                danger: Some("#f87171".to_string()),
            },
            typography: ThemeTypography {
                font_size: "16px".to_string(),
                letter_spacing: "0.02em".to_string(),
                ..ThemeTypography::default()
            },
            spacing: ThemeSpacing {
                gutter: "20px".to_string(),
                sidebar_width: "240px".to_string(),
                ..ThemeSpacing::default()
            },
            background: ThemeBackground {
                kind: BackgroundKind::Gradient,
                value: "linear-gradient(135deg, rgba(15,23,42,1) 0%, rgba(30,64,175,1) 100%)"
                    .to_string(),
                blur: Some(0.0),
                opacity: Some(1.0),
            },
            voice: voice(VisualizerStyle::Bars),
            metadata: preset_metadata(now),
        },
        ThemePalette {
            id: "creator-neon".to_string(),
            name: "Creator Neon".to_string(),
            surfaces: ThemeSurface {
                background: "#050505".to_string(),
                foreground: "#fdfdfd".to_string(),
                accent: "#f472b6".to_string(),
                muted: "#111827".to_string(),
                success: Some("#22d3ee".to_string()),
                warning: Some("#fbbf24".to_string()),
                danger: Some("#fb7185".to_string()),
            },
            typography: ThemeTypography {
                font_family: "'Space Grotesk', 'Segoe UI', sans-serif".to_string(),
                font_size: "15px".to_string(),
                ..ThemeTypography::default()
            },
            spacing: ThemeSpacing {
                border_radius: "24px".to_string(),
                gutter: "18px".to_string(),
                ..ThemeSpacing::default()
            },
            background: ThemeBackground {
                kind: BackgroundKind::Gradient,
                value: "linear-gradient(135deg, rgba(17,24,39,0.95) 0%, rgba(76,29,149,0.85) 100%)"
                    .to_string(),
                blur: Some(8.0),
                opacity: Some(0.95),
            },
            voice: voice(VisualizerStyle::Wave),
            metadata: preset_metadata(now),
        },
        ThemePalette {
            id: "accessibility-high-contrast".to_string(),
            name: "Accessibility High Contrast".to_string(),
            surfaces: ThemeSurface {
                background: "#ffffff".to_string(),
                foreground: "#0f172a".to_string(),
                accent: "#1d4ed8".to_string(),
                muted: "#e2e8f0".to_string(),
                success: Some("#15803d".to_string()),
                warning: Some("#b45309".to_string()),
                danger: Some("#b91c1c".to_string()),
            },
            typography: ThemeTypography {
                font_family: "'Atkinson Hyperlegible', 'Segoe UI', sans-serif".to_string(),
                font_size: "17px".to_string(),
                line_height: "1.8".to_string(),
                ..ThemeTypography::default()
            },
            spacing: ThemeSpacing {
                input_height: "60px".to_string(),
                gutter: "22px".to_string(),
                ..ThemeSpacing::default()
            },
            background: ThemeBackground {
                kind: BackgroundKind::Color,
                value: "#ffffff".to_string(),
                blur: Some(0.0),
                opacity: Some(1.0),
            },
            voice: voice(VisualizerStyle::Ring),
            metadata: preset_metadata(now),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_preset_ids_are_unique() {
        let presets = get_default_presets(0);
        let ids: HashSet<_> = presets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), presets.len());
    }

    #[test]
    fn test_default_theme_is_first_preset() {
        let presets = get_default_presets(0);
        assert_eq!(presets[0].id, DEFAULT_THEME_ID);
    }

    #[test]
    fn test_presets_are_flagged_and_stamped() {
        for theme in get_default_presets(1_700_000_000_000) {
            assert!(theme.is_preset(), "{} should be a preset", theme.id);
            let metadata = theme.metadata.unwrap();
            assert_eq!(metadata.created_at, 1_700_000_000_000);
            assert_eq!(metadata.updated_at, 1_700_000_000_000);
        }
    }
}
