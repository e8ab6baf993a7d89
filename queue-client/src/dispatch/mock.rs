//! Mock dispatcher for testing.
//!
//! Allows scripting outcomes per kind and capturing dispatched calls.

use super::{DispatchError, Dispatcher};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock dispatcher for testing.
///
/// Succeeds by default. Failures can be scripted one-shot per kind or made
/// permanent.
#[derive(Debug, Default)]
pub struct MockDispatcher {
    inner: Arc<Mutex<MockDispatcherInner>>,
}

#[derive(Debug, Default)]
struct MockDispatcherInner {
    calls: Vec<(String, serde_json::Value)>,
    scripted: HashMap<String, VecDeque<Option<String>>>,
    always_fail: Option<String>,
    delay: Option<Duration>,
}

impl MockDispatcher {
    /// Create a mock that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cause the next dispatch of `kind` to fail with the given error.
    pub fn fail_next(&self, kind: &str, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .scripted
            .entry(kind.to_string())
            .or_default()
            .push_back(Some(error.to_string()));
    }

    /// Cause the next dispatch of `kind` to succeed, ahead of later scripted failures.
    pub fn succeed_next(&self, kind: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .scripted
            .entry(kind.to_string())
            .or_default()
            .push_back(None);
    }

    /// Fail every dispatch that has no scripted outcome.
    pub fn fail_always(&self, error: &str) {
        self.inner.lock().unwrap().always_fail = Some(error.to_string());
    }

    /// Go back to succeeding by default.
    pub fn recover(&self) {
        self.inner.lock().unwrap().always_fail = None;
    }

    /// Sleep this long before every dispatch.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    /// All dispatched calls, in order.
    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of dispatched calls.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

impl Clone for MockDispatcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn dispatch(
        &self,
        kind: &str,
        payload: &serde_json::Value,
    ) -> Result<(), DispatchError> {
        let delay = self.inner.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().unwrap();
        inner.calls.push((kind.to_string(), payload.clone()));

        let scripted = inner
            .scripted
            .get_mut(kind)
            .and_then(|outcomes| outcomes.pop_front());

        match scripted {
            Some(Some(error)) => Err(DispatchError::Remote(error)),
            Some(None) => Ok(()),
            None => match &inner.always_fail {
                Some(error) => Err(DispatchError::Remote(error.clone())),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn succeeds_by_default_and_records_calls() {
        let mock = MockDispatcher::new();
        mock.dispatch("bookAppointment", &json!({"a": 1})).await.unwrap();

        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.calls()[0].0, "bookAppointment");
    }

    #[tokio::test]
    async fn scripted_failure_is_one_shot() {
        let mock = MockDispatcher::new();
        mock.fail_next("bookAppointment", "slot taken");

        assert!(mock.dispatch("bookAppointment", &json!({})).await.is_err());
        assert!(mock.dispatch("bookAppointment", &json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn fail_always_until_recover() {
        let mock = MockDispatcher::new();
        mock.fail_always("offline backend");

        assert!(mock.dispatch("updateVehicle", &json!({})).await.is_err());

        mock.recover();
        assert!(mock.dispatch("updateVehicle", &json!({})).await.is_ok());
    }
}
