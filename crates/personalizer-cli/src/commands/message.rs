use anyhow::{Context, Result};
use personalizer_core::message::RuntimeMessage;
use serde_json::Value;

use crate::runtime::{Runtime, ensure_ok};

pub async fn ping(runtime: &Runtime) -> Result<()> {
    ensure_ok(runtime.client().send(&RuntimeMessage::Ping).await)
        .context("Background did not answer")?;
    println!("pong");
    Ok(())
}

/// Sends a raw JSON payload and prints the response as-is.
pub async fn send(runtime: &Runtime, raw: &str) -> Result<()> {
    let payload: Value = serde_json::from_str(raw).context("Message is not valid JSON")?;
    let response = runtime.client().send_value(payload).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub async fn shortcut(runtime: &Runtime, name: &str) -> Result<()> {
    match runtime.background().on_command(name).await {
        Some(state) => println!(
            "Active persona: {}",
            state.active_persona_id.as_deref().unwrap_or("-")
        ),
        None => println!("Command '{}' dispatched", name),
    }
    Ok(())
}
