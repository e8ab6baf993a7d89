//! Retention window for queue records.

use pitstop_queue_types::{QueuedAction, Timestamp};
use std::time::Duration;

/// Default retention: 7 days.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Maximum age after which a record is purged, whatever its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionWindow(Duration);

impl RetentionWindow {
    /// Create a window of the given length.
    pub fn new(window: Duration) -> Self {
        Self(window)
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        self.0
    }

    /// Records created strictly before this instant are expired at `now`.
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now.saturating_sub(self.0)
    }

    /// Check if a record has outlived the window at `now`.
    pub fn is_expired(&self, action: &QueuedAction, now: Timestamp) -> bool {
        action.created_at < self.cutoff(now)
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitstop_queue_types::ActionStatus;
    use serde_json::json;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn action_at(created_at: i64, status: ActionStatus) -> QueuedAction {
        let mut action = QueuedAction::new_at(
            "bookAppointment",
            json!({}),
            Timestamp::from_millis(created_at),
        )
        .unwrap();
        action.status = status;
        action
    }

    #[test]
    fn cutoff_is_seven_days_back() {
        let now = Timestamp::from_millis(100 * DAY_MS);
        let window = RetentionWindow::default();
        assert_eq!(window.cutoff(now).as_millis(), 93 * DAY_MS);
    }

    #[test]
    fn eight_day_old_records_expire_regardless_of_status() {
        let now = Timestamp::from_millis(100 * DAY_MS);
        let window = RetentionWindow::default();

        for status in [
            ActionStatus::Pending,
            ActionStatus::Synced,
            ActionStatus::Failed,
        ] {
            assert!(window.is_expired(&action_at(92 * DAY_MS, status), now));
        }
    }

    #[test]
    fn recent_records_kept() {
        let now = Timestamp::from_millis(100 * DAY_MS);
        let window = RetentionWindow::default();
        assert!(!window.is_expired(&action_at(99 * DAY_MS, ActionStatus::Synced), now));
    }

    #[test]
    fn exactly_at_cutoff_is_kept() {
        let now = Timestamp::from_millis(100 * DAY_MS);
        let window = RetentionWindow::default();
        assert!(!window.is_expired(&action_at(93 * DAY_MS, ActionStatus::Failed), now));
    }

    #[test]
    fn custom_window() {
        let window = RetentionWindow::new(Duration::from_secs(60));
        let now = Timestamp::from_millis(120_000);
        assert!(window.is_expired(&action_at(59_999, ActionStatus::Pending), now));
        assert!(!window.is_expired(&action_at(60_000, ActionStatus::Pending), now));
    }
}
