//! Events and reports emitted by the queue.
//!
//! The queue never shows anything to the user itself. It publishes these
//! values and a presentation layer decides how to surface them (a toast
//! for [`QueueEvent::Queued`], an alert when a [`SyncReport`] has failures).

use pitstop_queue_types::{ActionId, ActionStatus, QueuedAction};
use serde::Serialize;

/// Events emitted to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// An action was stored for later sync.
    Queued {
        /// The queued action.
        id: ActionId,
        /// Remote operation tag.
        kind: String,
    },
    /// An action was executed remotely.
    Synced {
        /// The synced action.
        id: ActionId,
        /// Remote operation tag.
        kind: String,
    },
    /// An attempt failed and the action stays pending for the next pass.
    RetryScheduled {
        /// The action that failed.
        id: ActionId,
        /// Remote operation tag.
        kind: String,
        /// Failed attempts so far.
        retry_count: u32,
        /// Error message describing the failure.
        error: String,
    },
    /// An action exhausted its retries.
    Failed {
        /// The action that failed.
        id: ActionId,
        /// Remote operation tag.
        kind: String,
        /// Failed attempts so far.
        retry_count: u32,
        /// Error message from the last attempt.
        error: String,
    },
    /// An action was removed at the user's request.
    Discarded {
        /// The removed action.
        id: ActionId,
    },
    /// A sync pass finished (or was skipped).
    SyncCompleted(SyncReport),
}

/// Why a sync pass did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Connectivity was unavailable.
    Offline,
    /// Another pass was already in flight.
    AlreadyRunning,
}

/// Summary of one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Pending actions dispatched.
    pub attempted: usize,
    /// Actions that became synced.
    pub synced: usize,
    /// Actions left pending for another attempt.
    pub retried: usize,
    /// Actions that became failed.
    pub failed: usize,
    /// Records removed by retention.
    pub pruned: u64,
    /// Updated records that could not be written back.
    pub storage_errors: usize,
    /// Set when the pass did not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl SyncReport {
    /// A report for a pass that did not run.
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    /// Count a per-record transition event.
    pub fn record(&mut self, event: &QueueEvent) {
        match event {
            QueueEvent::Synced { .. } => self.synced += 1,
            QueueEvent::RetryScheduled { .. } => self.retried += 1,
            QueueEvent::Failed { .. } => self.failed += 1,
            _ => {}
        }
    }

    /// Check if any action exhausted its retries in this pass.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Check if the pass ran at all.
    pub fn ran(&self) -> bool {
        self.skipped.is_none()
    }
}

/// Record counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Awaiting sync.
    pub pending: usize,
    /// Executed remotely.
    pub synced: usize,
    /// Gave up.
    pub failed: usize,
}

impl QueueStats {
    /// Tally a set of records.
    pub fn from_actions<'a>(actions: impl IntoIterator<Item = &'a QueuedAction>) -> Self {
        let mut stats = Self::default();
        for action in actions {
            match action.status {
                ActionStatus::Pending => stats.pending += 1,
                ActionStatus::Synced => stats.synced += 1,
                ActionStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }

    /// Total number of records.
    pub fn total(&self) -> usize {
        self.pending + self.synced + self.failed
    }
}
