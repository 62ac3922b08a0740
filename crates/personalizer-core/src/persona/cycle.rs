//! Persona cycling for the next/previous shortcuts.

use indexmap::IndexMap;

use super::model::Persona;

/// Direction of a cycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// Returns the personas in cycling order, which is insertion order.
///
/// For the presets this follows their `Alt+Shift+1..3` shortcuts.
pub fn persona_cycle(personas: &IndexMap<String, Persona>) -> Vec<&Persona> {
    personas.values().collect()
}

/// Picks the persona a cycle step lands on, wrapping at both ends.
///
/// An active id that is `None` or not in the map selects the first persona.
/// Returns `None` only when there are no personas at all.
pub fn next_in_cycle<'a>(
    personas: &'a IndexMap<String, Persona>,
    active_id: Option<&str>,
    direction: CycleDirection,
) -> Option<&'a Persona> {
    let cycle = persona_cycle(personas);
    if cycle.is_empty() {
        return None;
    }

    let len = cycle.len();
    let position = active_id.and_then(|id| cycle.iter().position(|p| p.id == id));
    let index = match (position, direction) {
        (None, _) => 0,
        (Some(i), CycleDirection::Next) => (i + 1) % len,
        (Some(i), CycleDirection::Previous) => (i + len - 1) % len,
    };

    cycle.get(index).copied()
}
