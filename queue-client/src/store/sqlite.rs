//! SQLite storage backend for the offline queue.

use super::QueueStore;
use crate::error::StorageError;
use async_trait::async_trait;
use pitstop_queue_types::{ActionId, ActionStatus, QueuedAction, Timestamp};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// SQLite-based queue storage.
///
/// Uses WAL mode so the queue survives crashes mid-pass. The store is
/// usable as soon as [`SqliteQueueStore::open`] returns.
#[derive(Clone)]
pub struct SqliteQueueStore {
    pool: SqlitePool,
}

impl SqliteQueueStore {
    /// Open (or create) the queue database at `path` and run migrations.
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        tracing::debug!("Queue store opened at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory queue store (for testing).
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(":memory:")?;

        // A single connection that is never recycled, otherwise a new
        // connection would see a fresh, empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Close the pool. Later operations fail with `StorageError::NotReady`.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS queued_actions (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                retry_count INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_queued_actions_created ON queued_actions(created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_queued_actions_status ON queued_actions(status)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn put(&self, action: &QueuedAction) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&action.payload)?;

        // Upsert keeps `seq`, so an updated record keeps its queue position.
        sqlx::query(
            r#"
            INSERT INTO queued_actions (id, kind, payload, created_at, retry_count, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                payload = excluded.payload,
                created_at = excluded.created_at,
                retry_count = excluded.retry_count,
                status = excluded.status
            "#,
        )
        .bind(action.id.to_string())
        .bind(&action.kind)
        .bind(payload)
        .bind(action.created_at.as_millis())
        .bind(i64::from(action.retry_count))
        .bind(action.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<QueuedAction>, StorageError> {
        let rows = sqlx::query_as::<_, ActionRow>(
            r#"
            SELECT id, kind, payload, created_at, retry_count, status
            FROM queued_actions
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // An undecodable row is skipped so the rest of the queue still syncs.
        // Retention removes it once it ages out.
        Ok(rows
            .into_iter()
            .filter_map(|row| match QueuedAction::try_from(row) {
                Ok(action) => Some(action),
                Err(e) => {
                    tracing::error!("Skipping unreadable queued action: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn get(&self, id: &ActionId) -> Result<Option<QueuedAction>, StorageError> {
        let row = sqlx::query_as::<_, ActionRow>(
            r#"
            SELECT id, kind, payload, created_at, retry_count, status
            FROM queued_actions
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &ActionId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM queued_actions WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_older_than(&self, cutoff: Timestamp) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM queued_actions WHERE created_at < ?1")
            .bind(cutoff.as_millis())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Internal row type for SQLite queries.
#[derive(sqlx::FromRow)]
struct ActionRow {
    id: String,
    kind: String,
    payload: String,
    created_at: i64,
    retry_count: i64,
    status: String,
}

impl TryFrom<ActionRow> for QueuedAction {
    type Error = StorageError;

    fn try_from(row: ActionRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StorageError::Corrupt {
            id: row.id.clone(),
            reason,
        };

        Ok(QueuedAction {
            id: ActionId::from_str(&row.id).map_err(|e| corrupt(e.to_string()))?,
            kind: row.kind.clone(),
            payload: serde_json::from_str(&row.payload)
                .map_err(|e| corrupt(format!("payload: {}", e)))?,
            created_at: Timestamp::from_millis(row.created_at),
            retry_count: u32::try_from(row.retry_count)
                .map_err(|_| corrupt(format!("retry_count {}", row.retry_count)))?,
            status: ActionStatus::from_str(&row.status).map_err(|e| corrupt(e.to_string()))?,
        })
    }
}
