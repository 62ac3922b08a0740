use anyhow::{Context, Result};
use personalizer_core::message::RuntimeMessage;
use personalizer_core::persona::{CycleDirection, persona_cycle};
use personalizer_core::state::PersistedState;

use crate::runtime::{Runtime, ensure_ok};

pub async fn list(runtime: &Runtime) -> Result<()> {
    let state = fetch_state(runtime).await?;
    let active = state.active_persona_id.as_deref();

    for persona in persona_cycle(&state.personas) {
        let marker = if Some(persona.id.as_str()) == active {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<20} {:<24} theme={}",
            marker, persona.id, persona.name, persona.theme_id
        );
    }
    Ok(())
}

pub async fn set(runtime: &Runtime, id: &str) -> Result<()> {
    let response = runtime
        .client()
        .send(&RuntimeMessage::SetActivePersona {
            persona_id: id.to_string(),
        })
        .await;
    let state = ensure_ok(response)
        .with_context(|| format!("Failed to activate persona '{}'", id))?
        .state
        .context("SET_ACTIVE_PERSONA returned no state")?;
    report(&state);
    Ok(())
}

pub async fn next(runtime: &Runtime) -> Result<()> {
    cycle(runtime, CycleDirection::Next).await
}

pub async fn previous(runtime: &Runtime) -> Result<()> {
    cycle(runtime, CycleDirection::Previous).await
}

async fn cycle(runtime: &Runtime, direction: CycleDirection) -> Result<()> {
    let state = runtime
        .background()
        .cycle_persona(direction)
        .await
        .context("No persona to switch to")?;
    report(&state);
    Ok(())
}

pub(crate) async fn fetch_state(runtime: &Runtime) -> Result<PersistedState> {
    ensure_ok(runtime.client().send(&RuntimeMessage::GetState).await)?
        .state
        .context("GET_STATE returned no state")
}

fn report(state: &PersistedState) {
    match state.active_persona() {
        Some(persona) => println!("Active persona: {} ({})", persona.name, persona.id),
        None => println!("No active persona"),
    }
}
