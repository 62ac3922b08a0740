//! Persona domain module.
//!
//! This module contains the persona model, the shipped presets, and the
//! ordering used by the "next/previous persona" shortcuts.
//!
//! # Module Structure
//!
//! - `model`: Core persona domain model (`Persona`)
//! - `preset`: Default personas
//! - `cycle`: Deterministic cycling order for keyboard shortcuts

mod cycle;
mod model;
mod preset;

// Re-export public API
pub use cycle::{CycleDirection, next_in_cycle, persona_cycle};
pub use model::Persona;
pub use preset::{DEFAULT_PERSONA_ID, get_default_presets};
