//! Keyboard shortcut commands.

use std::fmt;
use std::str::FromStr;

use personalizer_core::persona::CycleDirection;

/// A named keyboard command delivered to the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutCommand {
    PersonaNext,
    PersonaPrevious,
    ToggleLayoutOverlay,
}

impl ShortcutCommand {
    pub const ALL: [ShortcutCommand; 3] = [
        ShortcutCommand::PersonaNext,
        ShortcutCommand::PersonaPrevious,
        ShortcutCommand::ToggleLayoutOverlay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShortcutCommand::PersonaNext => "persona-next",
            ShortcutCommand::PersonaPrevious => "persona-previous",
            ShortcutCommand::ToggleLayoutOverlay => "toggle-layout-overlay",
        }
    }

    /// Cycle direction for the persona commands.
    pub fn cycle_direction(&self) -> Option<CycleDirection> {
        match self {
            ShortcutCommand::PersonaNext => Some(CycleDirection::Next),
            ShortcutCommand::PersonaPrevious => Some(CycleDirection::Previous),
            ShortcutCommand::ToggleLayoutOverlay => None,
        }
    }
}

impl fmt::Display for ShortcutCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| format!("unknown shortcut command '{}'", s))
    }
}
