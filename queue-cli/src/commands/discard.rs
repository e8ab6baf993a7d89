//! Remove a queued action.

use anyhow::{Context, Result};
use pitstop_queue_types::ActionId;

use super::QueueContext;

/// Run the discard command.
pub async fn run(ctx: &QueueContext, id: &str) -> Result<()> {
    let id: ActionId = id.parse().context("Invalid action ID")?;

    let queue = ctx.open_local().await?;
    if !queue.discard(&id).await? {
        anyhow::bail!("No queued action with ID {}", id);
    }

    println!("Discarded action {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitstop_queue_client::Config;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn discard_existing_action() {
        let dir = tempdir().unwrap();
        let ctx = QueueContext::new(Config::default(), dir.path().join("queue.db"));
        let action = {
            let queue = ctx.open_local().await.unwrap();
            queue.enqueue("bookAppointment", json!({})).await.unwrap()
        };

        run(&ctx, &action.id.to_string()).await.unwrap();

        let queue = ctx.open_local().await.unwrap();
        assert!(queue.get(&action.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn discard_unknown_action_fails() {
        let dir = tempdir().unwrap();
        let ctx = QueueContext::new(Config::default(), dir.path().join("queue.db"));

        assert!(run(&ctx, &ActionId::new().to_string()).await.is_err());
        assert!(run(&ctx, "not-an-id").await.is_err());
    }
}
