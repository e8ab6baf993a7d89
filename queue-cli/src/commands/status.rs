//! Show queue counts.

use anyhow::Result;

use super::QueueContext;

/// Run the status command.
pub async fn run(ctx: &QueueContext) -> Result<()> {
    let queue = ctx.open_local().await?;
    let stats = queue.stats().await?;

    println!("=== pitstop-queue status ===");
    println!();
    println!("Database: {}", ctx.database.display());
    println!();
    println!("Actions:");
    println!("  Pending: {}", stats.pending);
    println!("  Synced:  {}", stats.synced);
    println!("  Failed:  {}", stats.failed);
    println!("  Total:   {}", stats.total());

    if stats.failed > 0 {
        println!();
        println!("Some actions could not be synced. Review them with 'pitstop-queue list --status failed'.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitstop_queue_client::Config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn status_on_fresh_database() {
        let dir = tempdir().unwrap();
        let ctx = QueueContext::new(Config::default(), dir.path().join("queue.db"));

        assert!(run(&ctx).await.is_ok());
    }
}
