//! Remote operation dispatch.
//!
//! The queue does not know how to book an appointment or update a vehicle.
//! The hosting application supplies a [`Dispatcher`] that maps an action
//! kind to the remote call, and the queue invokes it by tag during sync.
//!
//! # Implementations
//!
//! - [`HandlerRegistry`]: in-process async handlers keyed by kind
//! - [`HttpDispatcher`]: posts the payload to a document-store collection
//! - [`MockDispatcher`]: scripted outcomes for tests

mod http;
mod mock;
mod registry;

pub use http::HttpDispatcher;
pub use mock::MockDispatcher;
pub use registry::HandlerRegistry;

use async_trait::async_trait;
use thiserror::Error;

/// Dispatch errors.
///
/// Every variant counts as a failed attempt; none of them aborts a sync pass.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No remote operation registered for this kind.
    #[error("no handler for action kind: {0}")]
    UnknownAction(String),

    /// The remote operation reported a failure.
    #[error("remote operation failed: {0}")]
    Remote(String),

    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote operation did not finish in time.
    #[error("remote operation timed out")]
    Timeout,
}

/// Executes a queued action against the remote system.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Run the remote operation identified by `kind` with `payload`.
    async fn dispatch(&self, kind: &str, payload: &serde_json::Value)
        -> Result<(), DispatchError>;
}
