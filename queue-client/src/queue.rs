//! OfflineQueue - the main interface for the offline action queue.
//!
//! This module provides [`OfflineQueue`], which captures user actions while
//! the app is offline and replays them against the backend once
//! connectivity returns.
//!
//! # Architecture
//!
//! OfflineQueue uses the pure retry and retention logic from queue-core and
//! performs the I/O itself through the [`QueueStore`] and [`Dispatcher`]
//! traits.
//!
//! ```text
//! Application → OfflineQueue → Dispatcher → Backend
//!                   ↓      ↘
//!              QueueStore   queue-core (retry policy, retention)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pitstop_queue_client::{Connectivity, MockDispatcher, OfflineQueue, SqliteQueueStore};
//!
//! let store = SqliteQueueStore::open(Path::new("queue.db")).await?;
//! let queue = OfflineQueue::new(store, MockDispatcher::new(), Connectivity::offline());
//!
//! queue.enqueue("bookAppointment", json!({"service": "Oil Change"})).await?;
//! queue.connectivity().set_online(true);
//! let report = queue.sync().await?;
//! ```

use pitstop_queue_core::{
    AttemptOutcome, QueueEvent, QueueStats, RetentionWindow, RetryPolicy, SkipReason, SyncReport,
};
use pitstop_queue_types::{ActionId, ActionStatus, QueuedAction, Timestamp};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

use crate::config::SyncConfig;
use crate::connectivity::Connectivity;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::error::{QueueError, Result};
use crate::store::QueueStore;
use crate::triggers::BACKGROUND_SYNC_TAG;

/// Default upper bound on a single remote dispatch.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

const EVENT_CAPACITY: usize = 64;

/// The offline action queue.
///
/// Owns the store handle; the store itself is the only source of truth
/// for queue contents.
pub struct OfflineQueue<S: QueueStore, D: Dispatcher> {
    store: S,
    dispatcher: Arc<D>,
    connectivity: Connectivity,
    policy: RetryPolicy,
    retention: RetentionWindow,
    dispatch_timeout: Duration,
    background_tag: String,
    // Held for the whole of a sync pass and by `discard`.
    sync_guard: Mutex<()>,
    events: broadcast::Sender<QueueEvent>,
}

impl<S: QueueStore, D: Dispatcher + 'static> OfflineQueue<S, D> {
    /// Create a queue over an opened store.
    pub fn new(store: S, dispatcher: D, connectivity: Connectivity) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            dispatcher: Arc::new(dispatcher),
            connectivity,
            policy: RetryPolicy::default(),
            retention: RetentionWindow::default(),
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            background_tag: BACKGROUND_SYNC_TAG.to_string(),
            sync_guard: Mutex::new(()),
            events,
        }
    }

    /// Apply the sync section of the configuration.
    pub fn with_config(self, config: &SyncConfig) -> Self {
        self.with_retry_policy(config.retry_policy())
            .with_retention(config.retention())
            .with_dispatch_timeout(config.dispatch_timeout())
            .with_background_tag(&config.background_sync_tag)
    }

    /// Set the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the retention window.
    pub fn with_retention(mut self, retention: RetentionWindow) -> Self {
        self.retention = retention;
        self
    }

    /// Set the per-dispatch timeout.
    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    /// Set the background-sync tag this queue answers to.
    pub fn with_background_tag(mut self, tag: &str) -> Self {
        self.background_tag = tag.to_string();
        self
    }

    /// Queue an action for later sync.
    ///
    /// The action is queued only if this returns `Ok`. A storage failure
    /// means the action was lost, and the caller must tell the user.
    pub async fn enqueue(&self, kind: &str, payload: serde_json::Value) -> Result<QueuedAction> {
        let action = QueuedAction::new(kind, payload)?;

        if let Err(e) = self.store.put(&action).await {
            tracing::error!("Failed to queue {} action: {}", action.kind, e);
            return Err(e.into());
        }

        tracing::info!("Queued {} action {} for later sync", action.kind, action.id);
        self.emit(QueueEvent::Queued {
            id: action.id,
            kind: action.kind.clone(),
        });
        Ok(action)
    }

    /// Queue an action whose payload is any serializable value.
    pub async fn enqueue_serialized<T: Serialize + ?Sized>(
        &self,
        kind: &str,
        payload: &T,
    ) -> Result<QueuedAction> {
        let payload = serde_json::to_value(payload).map_err(QueueError::Payload)?;
        self.enqueue(kind, payload).await
    }

    /// Run one sync pass.
    ///
    /// Dispatches every pending action, records the outcome in the store,
    /// then prunes records older than the retention window. Per-record
    /// failures are recorded, not returned; only a failure to read the
    /// queue at all is an error.
    ///
    /// Returns a skipped report when offline or when another pass is
    /// already running.
    pub async fn sync(&self) -> Result<SyncReport> {
        let Ok(_guard) = self.sync_guard.try_lock() else {
            tracing::debug!("Sync already in progress, skipping");
            return Ok(self.finish(SyncReport::skipped(SkipReason::AlreadyRunning)));
        };

        if !self.connectivity.is_online() {
            tracing::debug!("Offline, skipping sync");
            return Ok(self.finish(SyncReport::skipped(SkipReason::Offline)));
        }

        let now = Timestamp::now();
        let actions = self.store.get_all().await.map_err(|e| {
            tracing::error!("Failed to read queued actions: {}", e);
            e
        })?;

        let mut report = SyncReport::default();

        for action in actions.into_iter().filter(|a| a.is_pending()) {
            report.attempted += 1;
            let outcome = self.attempt(&action).await;
            let (updated, event) = self.policy.apply(action, outcome);

            if let Err(e) = self.store.put(&updated).await {
                tracing::error!("Failed to record sync result for {}: {}", updated.id, e);
                report.storage_errors += 1;
                continue;
            }

            if let Some(event) = event {
                log_transition(&event);
                report.record(&event);
                self.emit(event);
            }
        }

        match self
            .store
            .delete_older_than(self.retention.cutoff(now))
            .await
        {
            Ok(pruned) => {
                if pruned > 0 {
                    tracing::info!("Pruned {} expired queued actions", pruned);
                }
                report.pruned = pruned;
            }
            Err(e) => {
                tracing::error!("Failed to prune expired actions: {}", e);
                report.storage_errors += 1;
            }
        }

        if report.has_failures() {
            tracing::warn!(
                "{} queued action(s) failed and will not be retried",
                report.failed
            );
        }
        tracing::info!(
            "Sync finished: {} attempted, {} synced, {} retrying, {} failed",
            report.attempted,
            report.synced,
            report.retried,
            report.failed
        );

        Ok(self.finish(report))
    }

    /// Entry point for the platform background-sync callback.
    ///
    /// Runs a pass when `tag` is this queue's tag; other tags belong to
    /// someone else and return `None`.
    pub async fn on_background_sync(&self, tag: &str) -> Result<Option<SyncReport>> {
        if tag != self.background_tag {
            tracing::debug!("Ignoring background sync for tag {}", tag);
            return Ok(None);
        }
        self.sync().await.map(Some)
    }

    /// All records, oldest first.
    pub async fn list(&self) -> Result<Vec<QueuedAction>> {
        Ok(self.store.get_all().await?)
    }

    /// Records in the given state, oldest first.
    pub async fn list_by_status(&self, status: ActionStatus) -> Result<Vec<QueuedAction>> {
        let mut actions = self.list().await?;
        actions.retain(|a| a.status == status);
        Ok(actions)
    }

    /// A single record.
    pub async fn get(&self, id: &ActionId) -> Result<Option<QueuedAction>> {
        Ok(self.store.get(id).await?)
    }

    /// Record counts by status.
    pub async fn stats(&self) -> Result<QueueStats> {
        let actions = self.list().await?;
        Ok(QueueStats::from_actions(&actions))
    }

    /// Remove a record at the user's request.
    ///
    /// Waits for an in-flight sync pass so the record is not written back
    /// after removal. Returns whether the record existed.
    pub async fn discard(&self, id: &ActionId) -> Result<bool> {
        let _guard = self.sync_guard.lock().await;

        let existed = self.store.get(id).await?.is_some();
        self.store.delete(id).await?;

        if existed {
            tracing::info!("Discarded queued action {}", id);
            self.emit(QueueEvent::Discarded { id: *id });
        }
        Ok(existed)
    }

    /// Subscribe to queue events.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    /// The connectivity signal this queue checks before syncing.
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// The background-sync tag this queue answers to.
    pub fn background_tag(&self) -> &str {
        &self.background_tag
    }

    /// Get a reference to the underlying store (for testing).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the dispatcher (for testing).
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Dispatch one action, bounded by the dispatch timeout.
    ///
    /// The dispatch runs as its own task so a panicking handler counts as
    /// a failed attempt instead of tearing down the pass.
    async fn attempt(&self, action: &QueuedAction) -> AttemptOutcome {
        let dispatcher = Arc::clone(&self.dispatcher);
        let kind = action.kind.clone();
        let payload = action.payload.clone();
        let mut task = tokio::spawn(async move { dispatcher.dispatch(&kind, &payload).await });

        let result = match tokio::time::timeout(self.dispatch_timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(DispatchError::Remote(format!(
                "dispatch aborted: {}",
                join_error
            ))),
            Err(_) => {
                task.abort();
                Err(DispatchError::Timeout)
            }
        };

        match result {
            Ok(()) => AttemptOutcome::Succeeded,
            Err(e) => AttemptOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    fn finish(&self, report: SyncReport) -> SyncReport {
        self.emit(QueueEvent::SyncCompleted(report.clone()));
        report
    }

    fn emit(&self, event: QueueEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn log_transition(event: &QueueEvent) {
    match event {
        QueueEvent::Synced { id, kind } => {
            tracing::debug!("Synced {} action {}", kind, id);
        }
        QueueEvent::RetryScheduled {
            id,
            kind,
            retry_count,
            error,
        } => {
            tracing::warn!(
                "Sync of {} action {} failed (attempt {}): {}",
                kind,
                id,
                retry_count,
                error
            );
        }
        QueueEvent::Failed {
            id,
            kind,
            retry_count,
            error,
        } => {
            tracing::warn!(
                "Giving up on {} action {} after {} attempts: {}",
                kind,
                id,
                retry_count,
                error
            );
        }
        _ => {}
    }
}
