//! Theme palette domain model.
//!
//! A palette describes everything the view layer needs to restyle the chat
//! client: colors, typography, spacing, the page background and the look of
//! the voice-input visualizer.

use serde::{Deserialize, Serialize};

/// Color surfaces of a palette.
///
/// The semantic colors are optional; consumers fall back to `accent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSurface {
    pub background: String,
    pub foreground: String,
    pub accent: String,
    pub muted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
}

/// Font settings, stored as CSS values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTypography {
    pub font_family: String,
    pub font_size: String,
    pub line_height: String,
    pub letter_spacing: String,
}

impl Default for ThemeTypography {
    fn default() -> Self {
        Self {
            font_family:
                "'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif"
                    .to_string(),
            font_size: "15px".to_string(),
            line_height: "1.6".to_string(),
            letter_spacing: "0.01em".to_string(),
        }
    }
}

/// Layout metrics, stored as CSS values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSpacing {
    pub border_radius: String,
    pub gutter: String,
    pub input_height: String,
    pub sidebar_width: String,
}

impl Default for ThemeSpacing {
    fn default() -> Self {
        Self {
            border_radius: "12px".to_string(),
            gutter: "16px".to_string(),
            input_height: "54px".to_string(),
            sidebar_width: "280px".to_string(),
        }
    }
}

/// How the `value` of a [`ThemeBackground`] is interpreted.
///
/// Kinds added by a newer version decode as `Other` and are written back
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    Color,
    Gradient,
    Image,
    #[serde(untagged)]
    Other(String),
}

impl BackgroundKind {
    pub fn as_str(&self) -> &str {
        match self {
            BackgroundKind::Color => "color",
            BackgroundKind::Gradient => "gradient",
            BackgroundKind::Image => "image",
            BackgroundKind::Other(kind) => kind,
        }
    }
}

/// Page background descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeBackground {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    /// A color, a CSS gradient or an image URL depending on `kind`.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Visualizer look for the voice-input overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisualizerStyle {
    #[default]
    Bars,
    Wave,
    Ring,
    #[serde(untagged)]
    Other(String),
}

/// Corner of the composer where the microphone button is anchored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MicPosition {
    #[default]
    BottomRight,
    BottomLeft,
    #[serde(untagged)]
    Other(String),
}

/// Voice visualizer settings attached to a palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VoiceStyle {
    #[serde(default)]
    pub visualizer_style: VisualizerStyle,
    #[serde(default)]
    pub mic_position: MicPosition,
}

/// Bookkeeping attached to a palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeMetadata {
    /// Creation time (milliseconds since epoch)
    pub created_at: i64,
    /// Last update time (milliseconds since epoch)
    pub updated_at: i64,
    /// Whether this palette ships with the extension
    #[serde(default)]
    pub preset: bool,
}

/// A complete theme palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemePalette {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub surfaces: ThemeSurface,
    pub typography: ThemeTypography,
    pub spacing: ThemeSpacing,
    pub background: ThemeBackground,
    #[serde(default)]
    pub voice: VoiceStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ThemeMetadata>,
}

impl ThemePalette {
    /// Returns true if this palette is one of the shipped presets.
    pub fn is_preset(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.preset)
    }
}
