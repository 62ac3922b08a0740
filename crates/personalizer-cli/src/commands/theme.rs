use anyhow::{Context, Result};
use personalizer_core::theme::{resolve_theme, theme_variables};

use crate::commands::persona::fetch_state;
use crate::runtime::Runtime;

pub async fn list(runtime: &Runtime) -> Result<()> {
    let state = fetch_state(runtime).await?;
    let active = state.active_theme().map(|t| t.id.as_str());

    for theme in state.themes.values() {
        let marker = if Some(theme.id.as_str()) == active {
            "*"
        } else {
            " "
        };
        let origin = if theme.is_preset() { "preset" } else { "custom" };
        println!("{} {:<28} {:<24} {}", marker, theme.id, theme.name, origin);
    }
    Ok(())
}

pub async fn vars(runtime: &Runtime, id: Option<&str>) -> Result<()> {
    let state = fetch_state(runtime).await?;
    let theme = match id {
        Some(id) => resolve_theme(&state.themes, Some(id))
            .with_context(|| format!("Theme '{}' not found", id))?,
        None => state.active_theme().context("No active theme")?,
    };

    for (name, value) in theme_variables(theme) {
        println!("{}: {};", name, value);
    }
    Ok(())
}
