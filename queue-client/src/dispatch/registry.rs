//! Dispatcher backed by in-process async handlers.

use super::{DispatchError, Dispatcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send>>;
type Handler = Arc<dyn Fn(serde_json::Value) -> HandlerFuture + Send + Sync>;

/// Maps action kinds to async handler functions.
///
/// # Example
///
/// ```ignore
/// let registry = HandlerRegistry::new().register("bookAppointment", |payload| async move {
///     bookings.create(payload).await.map_err(|e| DispatchError::Remote(e.to_string()))
/// });
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `kind`, replacing any previous one.
    pub fn register<F, Fut>(mut self, kind: &str, handler: F) -> Self
    where
        F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), DispatchError>> + Send + 'static,
    {
        let handler: Handler =
            Arc::new(move |payload| -> HandlerFuture { Box::pin(handler(payload)) });
        self.handlers.insert(kind.to_string(), handler);
        self
    }

    /// Check if a handler exists for `kind`.
    pub fn handles(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.handlers.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[async_trait]
impl Dispatcher for HandlerRegistry {
    async fn dispatch(
        &self,
        kind: &str,
        payload: &serde_json::Value,
    ) -> Result<(), DispatchError> {
        let handler = self
            .handlers
            .get(kind)
            .ok_or_else(|| DispatchError::UnknownAction(kind.to_string()))?;
        handler(payload.clone()).await
    }
}
