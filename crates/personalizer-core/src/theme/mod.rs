//! Theme domain module.
//!
//! # Module Structure
//!
//! - `model`: Theme palette and its descriptor types
//! - `preset`: Built-in palettes shipped with every installation
//! - `variables`: CSS custom-property map consumed by the view layer

mod model;
mod preset;
mod variables;

// Re-export public API
pub use model::{
    BackgroundKind, MicPosition, ThemeBackground, ThemeMetadata, ThemePalette, ThemeSpacing,
    ThemeSurface, ThemeTypography, VisualizerStyle, VoiceStyle,
};
pub use preset::{DEFAULT_THEME_ID, get_default_presets};
pub use variables::{THEME_VARIABLE_PREFIX, resolve_theme, theme_variables};
