//! Storage layer for the offline queue.
//!
//! The store is the single source of truth for queued actions. Nothing in
//! this crate caches queue contents in memory.

mod memory;
mod sqlite;

pub use memory::MemoryQueueStore;
pub use sqlite::SqliteQueueStore;

use crate::error::StorageResult;
use async_trait::async_trait;
use pitstop_queue_types::{ActionId, QueuedAction, Timestamp};

/// Trait for queue storage backends.
///
/// Every operation reports failure through `StorageError`; a backend that
/// is not open returns `StorageError::NotReady` rather than succeeding.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Insert a record, or overwrite the record with the same id.
    async fn put(&self, action: &QueuedAction) -> StorageResult<()>;

    /// Get every record, oldest first.
    ///
    /// Records that cannot be decoded are logged and left out, so one bad
    /// row never hides the rest of the queue.
    async fn get_all(&self) -> StorageResult<Vec<QueuedAction>>;

    /// Get a single record by id.
    async fn get(&self, id: &ActionId) -> StorageResult<Option<QueuedAction>>;

    /// Remove a record. Removing a missing id is not an error.
    async fn delete(&self, id: &ActionId) -> StorageResult<()>;

    /// Remove every record created strictly before `cutoff`.
    ///
    /// Returns the number of records deleted.
    async fn delete_older_than(&self, cutoff: Timestamp) -> StorageResult<u64>;
}
