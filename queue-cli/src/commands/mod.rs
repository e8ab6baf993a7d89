//! CLI command implementations.

pub mod discard;
pub mod enqueue;
pub mod list;
pub mod status;
pub mod sync;

use anyhow::{Context, Result};
use pitstop_queue_client::{
    Config, Connectivity, Dispatcher, HandlerRegistry, OfflineQueue, SqliteQueueStore,
};
use std::path::PathBuf;

/// Resolved configuration shared by every command.
#[derive(Debug, Clone)]
pub struct QueueContext {
    /// Loaded configuration.
    pub config: Config,
    /// Queue database path.
    pub database: PathBuf,
}

impl QueueContext {
    /// Create a context.
    pub fn new(config: Config, database: PathBuf) -> Self {
        Self { config, database }
    }

    /// Open the queue with the given dispatcher and connectivity.
    pub async fn open_queue<D: Dispatcher + 'static>(
        &self,
        dispatcher: D,
        online: bool,
    ) -> Result<OfflineQueue<SqliteQueueStore, D>> {
        if let Some(parent) = self.database.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let store = SqliteQueueStore::open(&self.database)
            .await
            .with_context(|| format!("Failed to open queue at {}", self.database.display()))?;

        Ok(OfflineQueue::new(store, dispatcher, Connectivity::new(online))
            .with_config(&self.config.sync))
    }

    /// Open the queue for commands that never dispatch.
    pub async fn open_local(&self) -> Result<OfflineQueue<SqliteQueueStore, HandlerRegistry>> {
        self.open_queue(HandlerRegistry::new(), false).await
    }
}

/// Format a millisecond Unix timestamp relative to now.
pub fn format_timestamp(millis: i64) -> String {
    let now = pitstop_queue_types::Timestamp::now().as_millis();
    let diff = now.saturating_sub(millis).max(0) / 1000;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_timestamp_works() {
        let now = pitstop_queue_types::Timestamp::now().as_millis();

        assert_eq!(format_timestamp(now), "just now");
        assert!(format_timestamp(now - 120_000).contains("minutes"));
        assert!(format_timestamp(now - 7_200_000).contains("hours"));
        assert!(format_timestamp(now - 172_800_000).contains("days"));
    }

    #[tokio::test]
    async fn open_queue_creates_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("nested").join("queue.db");
        let ctx = QueueContext::new(Config::default(), database.clone());

        let queue = ctx.open_local().await.unwrap();

        assert!(database.exists());
        assert!(!queue.connectivity().is_online());
    }
}
