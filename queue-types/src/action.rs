//! The persisted queue record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ActionError, ActionId, Timestamp};

/// Lifecycle state of a queued action.
///
/// `Synced` and `Failed` are terminal: a record in either state is only
/// ever deleted, never transitioned again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// Waiting for a sync pass.
    Pending,
    /// Executed remotely.
    Synced,
    /// Gave up after exhausting retries.
    Failed,
}

impl ActionStatus {
    /// Tag used in storage and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
        }
    }

    /// Check if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for ActionStatus {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "failed" => Ok(Self::Failed),
            other => Err(ActionError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user action captured while offline, waiting to be replayed remotely.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    /// Unique identifier, assigned at creation.
    pub id: ActionId,
    /// Which remote operation to invoke (e.g. `bookAppointment`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Domain data for the remote operation.
    pub payload: serde_json::Value,
    /// Creation time, used for retention.
    pub created_at: Timestamp,
    /// Number of failed sync attempts so far.
    pub retry_count: u32,
    /// Current lifecycle state.
    pub status: ActionStatus,
}

impl QueuedAction {
    /// Create a new pending action stamped with the current time.
    pub fn new(kind: &str, payload: serde_json::Value) -> Result<Self, ActionError> {
        Self::new_at(kind, payload, Timestamp::now())
    }

    /// Create a new pending action with an explicit creation time.
    pub fn new_at(
        kind: &str,
        payload: serde_json::Value,
        created_at: Timestamp,
    ) -> Result<Self, ActionError> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ActionError::EmptyKind);
        }
        Ok(Self {
            id: ActionId::new(),
            kind: kind.to_string(),
            payload,
            created_at,
            retry_count: 0,
            status: ActionStatus::Pending,
        })
    }

    /// Check if the action still awaits a sync pass.
    pub fn is_pending(&self) -> bool {
        self.status == ActionStatus::Pending
    }
}

// Payloads carry customer details (names, phone numbers), keep them out of logs.
impl fmt::Debug for QueuedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedAction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("payload", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("retry_count", &self.retry_count)
            .field("status", &self.status)
            .finish()
    }
}
