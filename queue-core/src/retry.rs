//! Retry policy for queued actions.
//!
//! Applies the outcome of one sync attempt to a record and returns the
//! updated record plus the event to publish. Like the rest of this crate
//! it performs no I/O; the caller persists the record.
//!
//! ```text
//! Pending ──success─────────────────────────────► Synced
//!    │
//!    ├──failure, retry_count + 1 < max──► Pending (retry_count + 1)
//!    │
//!    └──failure, retry_count + 1 = max──► Failed (retry_count = max)
//! ```
//!
//! Every failed attempt counts once, so with the default maximum of 3 the
//! third consecutive failure is terminal. A retried record is not
//! re-attempted within the same pass. It waits for the next externally
//! triggered sync.

use pitstop_queue_types::{ActionStatus, QueuedAction};

use crate::QueueEvent;

/// Default number of failed attempts after which an action is marked failed.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Result of dispatching one action to the remote system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The remote operation succeeded.
    Succeeded,
    /// The remote operation failed, timed out, or could not be dispatched.
    Failed {
        /// Error message describing the failure.
        error: String,
    },
}

/// Retry bookkeeping for failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    /// Create a policy that gives up after `max_retries` failed attempts.
    ///
    /// Every action gets at least one attempt, so zero is treated as one.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
        }
    }

    /// Retry count at which an action is marked failed.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Apply an attempt outcome to an action.
    ///
    /// Returns the updated action and the event describing the transition.
    /// Actions that are not pending are returned unchanged with no event.
    pub fn apply(
        &self,
        mut action: QueuedAction,
        outcome: AttemptOutcome,
    ) -> (QueuedAction, Option<QueueEvent>) {
        if action.status != ActionStatus::Pending {
            return (action, None);
        }

        match outcome {
            AttemptOutcome::Succeeded => {
                action.status = ActionStatus::Synced;
                let event = QueueEvent::Synced {
                    id: action.id,
                    kind: action.kind.clone(),
                };
                (action, Some(event))
            }
            AttemptOutcome::Failed { error } => {
                if action.retry_count < self.max_retries {
                    action.retry_count += 1;
                }
                if action.retry_count >= self.max_retries {
                    action.status = ActionStatus::Failed;
                    let event = QueueEvent::Failed {
                        id: action.id,
                        kind: action.kind.clone(),
                        retry_count: action.retry_count,
                        error,
                    };
                    return (action, Some(event));
                }
                let event = QueueEvent::RetryScheduled {
                    id: action.id,
                    kind: action.kind.clone(),
                    retry_count: action.retry_count,
                    error,
                };
                (action, Some(event))
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending() -> QueuedAction {
        QueuedAction::new("bookAppointment", json!({"service": "Oil Change"})).unwrap()
    }

    fn failure() -> AttemptOutcome {
        AttemptOutcome::Failed {
            error: "503 Service Unavailable".into(),
        }
    }

    #[test]
    fn success_marks_synced() {
        let policy = RetryPolicy::default();
        let (action, event) = policy.apply(pending(), AttemptOutcome::Succeeded);

        assert_eq!(action.status, ActionStatus::Synced);
        assert_eq!(action.retry_count, 0);
        assert!(matches!(event, Some(QueueEvent::Synced { .. })));
    }

    #[test]
    fn failure_increments_retry_count() {
        let policy = RetryPolicy::default();
        let (action, event) = policy.apply(pending(), failure());

        assert_eq!(action.status, ActionStatus::Pending);
        assert_eq!(action.retry_count, 1);
        match event {
            Some(QueueEvent::RetryScheduled {
                retry_count, error, ..
            }) => {
                assert_eq!(retry_count, 1);
                assert_eq!(error, "503 Service Unavailable");
            }
            other => panic!("Expected RetryScheduled, got {:?}", other),
        }
    }

    #[test]
    fn failure_reaching_max_marks_failed() {
        let policy = RetryPolicy::default();
        let mut action = pending();
        action.retry_count = 2;

        let (action, event) = policy.apply(action, failure());

        assert_eq!(action.status, ActionStatus::Failed);
        assert_eq!(action.retry_count, 3);
        match event {
            Some(QueueEvent::Failed { retry_count, .. }) => assert_eq!(retry_count, 3),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn pending_at_cap_fails_without_exceeding() {
        let policy = RetryPolicy::default();
        let mut action = pending();
        action.retry_count = 3;

        let (action, _) = policy.apply(action, failure());

        assert_eq!(action.status, ActionStatus::Failed);
        assert_eq!(action.retry_count, 3);
    }

    #[test]
    fn retry_count_never_exceeds_max() {
        let policy = RetryPolicy::default();
        let mut action = pending();
        let mut previous = action.retry_count;

        for _ in 0..10 {
            let (next, _) = policy.apply(action, failure());
            assert!(next.retry_count >= previous);
            assert!(next.retry_count <= policy.max_retries());
            previous = next.retry_count;
            action = next;
        }

        assert_eq!(action.status, ActionStatus::Failed);
        assert_eq!(action.retry_count, 3);
    }

    #[test]
    fn third_failure_is_terminal() {
        let policy = RetryPolicy::default();
        let mut action = pending();

        for expected in 1..=2 {
            let (next, _) = policy.apply(action, failure());
            assert_eq!(next.status, ActionStatus::Pending);
            assert_eq!(next.retry_count, expected);
            action = next;
        }

        let (action, _) = policy.apply(action, failure());
        assert_eq!(action.status, ActionStatus::Failed);
        assert_eq!(action.retry_count, 3);

        let (after, event) = policy.apply(action.clone(), failure());
        assert_eq!(after, action);
        assert!(event.is_none());
    }

    #[test]
    fn terminal_records_are_untouched() {
        let policy = RetryPolicy::default();

        let mut synced = pending();
        synced.status = ActionStatus::Synced;
        let (after, event) = policy.apply(synced.clone(), failure());
        assert_eq!(after, synced);
        assert!(event.is_none());

        let mut failed = pending();
        failed.status = ActionStatus::Failed;
        failed.retry_count = 3;
        let (after, event) = policy.apply(failed.clone(), AttemptOutcome::Succeeded);
        assert_eq!(after, failed);
        assert!(event.is_none());
    }

    #[test]
    fn zero_max_retries_fails_first_attempt_and_counts_it() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.max_retries(), 1);

        let (action, event) = policy.apply(pending(), failure());
        assert_eq!(action.status, ActionStatus::Failed);
        assert_eq!(action.retry_count, 1);
        assert!(matches!(
            event,
            Some(QueueEvent::Failed { retry_count: 1, .. })
        ));
    }

    #[test]
    fn id_and_payload_preserved() {
        let policy = RetryPolicy::default();
        let original = pending();
        let (after, _) = policy.apply(original.clone(), failure());
        assert_eq!(after.id, original.id);
        assert_eq!(after.payload, original.payload);
        assert_eq!(after.created_at, original.created_at);
    }
}
