use anyhow::{Context, Result};
use personalizer_application::InstallReason;
use personalizer_core::message::RuntimeMessage;
use personalizer_core::state::PersistedState;

use crate::runtime::{Runtime, ensure_ok};

pub async fn show(runtime: &Runtime) -> Result<()> {
    let response = ensure_ok(runtime.client().send(&RuntimeMessage::GetState).await)?;
    let state = response.state.context("GET_STATE returned no state")?;
    print_state(&state)
}

pub async fn reset(runtime: &Runtime) -> Result<()> {
    let state = runtime.background().reset_to_defaults().await;
    println!(
        "State reset; active persona is {}",
        state.active_persona_id.as_deref().unwrap_or("-")
    );
    Ok(())
}

pub async fn install(runtime: &Runtime, update: bool) -> Result<()> {
    let reason = if update {
        InstallReason::Update
    } else {
        InstallReason::Install
    };
    let state = runtime.background().on_installed(reason).await;
    println!(
        "State initialized ({} personas, {} themes)",
        state.personas.len(),
        state.themes.len()
    );
    Ok(())
}

pub fn print_state(state: &PersistedState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to encode state")?;
    println!("{}", json);
    Ok(())
}
