//! Error types for queue records.

use thiserror::Error;

/// Errors that can occur when building or parsing queue records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Action id is not a valid UUID
    #[error("invalid action id: {0}")]
    InvalidId(String),

    /// Unknown status tag
    #[error("invalid action status: {0}")]
    InvalidStatus(String),

    /// Action kind was empty or whitespace
    #[error("action kind must not be empty")]
    EmptyKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ActionError::InvalidStatus("done".into());
        assert_eq!(err.to_string(), "invalid action status: done");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ActionError>();
    }
}
