//! In-memory queue store for testing.
//!
//! Allows injecting storage failures and toggling readiness.

use super::QueueStore;
use crate::error::StorageError;
use async_trait::async_trait;
use pitstop_queue_types::{ActionId, QueuedAction, Timestamp};
use std::sync::{Arc, Mutex};

/// In-memory queue store.
///
/// Clones share the same records, so a test can keep a handle while the
/// queue owns another.
#[derive(Debug, Clone)]
pub struct MemoryQueueStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug)]
struct MemoryStoreInner {
    ready: bool,
    // Insertion order doubles as queue order.
    records: Vec<QueuedAction>,
    fail_next_put: Option<String>,
    fail_next_get_all: Option<String>,
    put_count: usize,
}

impl MemoryQueueStore {
    /// Create an empty, ready store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                ready: true,
                records: Vec::new(),
                fail_next_put: None,
                fail_next_get_all: None,
                put_count: 0,
            })),
        }
    }

    /// Mark the store ready or not. A store that is not ready fails every call.
    pub fn set_ready(&self, ready: bool) {
        self.inner.lock().unwrap().ready = ready;
    }

    /// Cause the next `put()` to fail with the given error.
    pub fn fail_next_put(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_put = Some(error.to_string());
    }

    /// Cause the next `get_all()` to fail with the given error.
    pub fn fail_next_get_all(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_get_all = Some(error.to_string());
    }

    /// Current records, bypassing readiness and failure injection.
    pub fn snapshot(&self) -> Vec<QueuedAction> {
        self.inner.lock().unwrap().records.clone()
    }

    /// Number of successful `put()` calls.
    pub fn put_count(&self) -> usize {
        self.inner.lock().unwrap().put_count
    }
}

impl Default for MemoryQueueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStoreInner {
    fn check_ready(&self) -> Result<(), StorageError> {
        if self.ready {
            Ok(())
        } else {
            Err(StorageError::NotReady)
        }
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn put(&self, action: &QueuedAction) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_ready()?;

        if let Some(error) = inner.fail_next_put.take() {
            return Err(StorageError::Injected(error));
        }

        match inner.records.iter_mut().find(|r| r.id == action.id) {
            Some(existing) => *existing = action.clone(),
            None => inner.records.push(action.clone()),
        }
        inner.put_count += 1;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<QueuedAction>, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_ready()?;

        if let Some(error) = inner.fail_next_get_all.take() {
            return Err(StorageError::Injected(error));
        }

        let mut records = inner.records.clone();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn get(&self, id: &ActionId) -> Result<Option<QueuedAction>, StorageError> {
        let inner = self.inner.lock().unwrap();
        inner.check_ready()?;
        Ok(inner.records.iter().find(|r| r.id == *id).cloned())
    }

    async fn delete(&self, id: &ActionId) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_ready()?;
        inner.records.retain(|r| r.id != *id);
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: Timestamp) -> Result<u64, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_ready()?;
        let before = inner.records.len();
        inner.records.retain(|r| r.created_at >= cutoff);
        Ok((before - inner.records.len()) as u64)
    }
}
