//! Queue an action for later sync.

use anyhow::{Context, Result};

use super::QueueContext;

/// Run the enqueue command.
pub async fn run(ctx: &QueueContext, kind: &str, payload: &str) -> Result<()> {
    let payload: serde_json::Value =
        serde_json::from_str(payload).context("Payload is not valid JSON")?;

    let queue = ctx.open_local().await?;
    let action = queue
        .enqueue(kind, payload)
        .await
        .context("Failed to queue action")?;

    println!("Queued {} action {}", action.kind, action.id);
    println!("It will be sent automatically when you're back online.");

    Ok(())
}
