//! List queued actions.

use anyhow::{Context, Result};
use pitstop_queue_types::ActionStatus;

use super::{format_timestamp, QueueContext};

/// Run the list command.
pub async fn run(ctx: &QueueContext, status: Option<&str>) -> Result<()> {
    let status: Option<ActionStatus> = status
        .map(|s| s.parse::<ActionStatus>())
        .transpose()
        .context("Status must be one of pending, synced, failed")?;

    let queue = ctx.open_local().await?;
    let actions = match status {
        Some(status) => queue.list_by_status(status).await?,
        None => queue.list().await?,
    };

    if actions.is_empty() {
        println!("No queued actions.");
        return Ok(());
    }

    for action in &actions {
        println!(
            "{}  {:<8} {:<20} retries: {}  ({})",
            action.id,
            action.status.as_str(),
            action.kind,
            action.retry_count,
            format_timestamp(action.created_at.as_millis())
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitstop_queue_client::Config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn list_empty_queue() {
        let dir = tempdir().unwrap();
        let ctx = QueueContext::new(Config::default(), dir.path().join("queue.db"));

        assert!(run(&ctx, None).await.is_ok());
    }

    #[tokio::test]
    async fn list_rejects_unknown_status() {
        let dir = tempdir().unwrap();
        let ctx = QueueContext::new(Config::default(), dir.path().join("queue.db"));

        assert!(run(&ctx, Some("archived")).await.is_err());
    }
}
