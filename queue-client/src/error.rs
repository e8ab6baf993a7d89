//! Error types for queue-client.

use pitstop_queue_types::ActionError;

/// Main error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The action could not be built.
    #[error("invalid action: {0}")]
    InvalidAction(#[from] ActionError),

    /// The payload could not be converted to JSON.
    #[error("payload serialization failed: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row does not decode into a record.
    #[error("corrupt record {id}: {reason}")]
    Corrupt {
        /// The offending row id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The store is not open (never opened, or already closed).
    #[error("queue store is not ready")]
    NotReady,

    /// Failure injected by a test double.
    #[error("injected failure: {0}")]
    Injected(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => StorageError::NotReady,
            other => StorageError::Database(other),
        }
    }
}

/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_closed_maps_to_not_ready() {
        let err: StorageError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, StorageError::NotReady));
    }

    #[test]
    fn storage_error_wraps_into_queue_error() {
        let err: QueueError = StorageError::NotReady.into();
        assert_eq!(err.to_string(), "storage error: queue store is not ready");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueueError>();
        assert_send_sync::<StorageError>();
    }
}
