//! HTTP dispatcher for the hosted document store.
//!
//! Each action kind is routed to a collection, and the payload is posted
//! as a new record: `POST {base_url}/{collection}`.

use super::{DispatchError, Dispatcher};
use crate::config::RemoteConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Dispatcher that creates records in a document-store REST API.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    base_url: String,
    routes: HashMap<String, String>,
}

impl HttpDispatcher {
    /// Create a dispatcher from the remote configuration.
    pub fn new(config: &RemoteConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            routes: config.routes.clone(),
        })
    }

    /// URL that receives actions of `kind`, if the kind is routed.
    pub fn endpoint(&self, kind: &str) -> Option<String> {
        self.routes
            .get(kind)
            .map(|collection| format!("{}/{}", self.base_url, collection.trim_matches('/')))
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(
        &self,
        kind: &str,
        payload: &serde_json::Value,
    ) -> Result<(), DispatchError> {
        let url = self
            .endpoint(kind)
            .ok_or_else(|| DispatchError::UnknownAction(kind.to_string()))?;

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!("POST {} -> {}", url, status);
            Ok(())
        } else {
            Err(DispatchError::Remote(format!("POST {} returned {}", url, status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remote_config() -> RemoteConfig {
        let mut routes = HashMap::new();
        routes.insert("bookAppointment".to_string(), "appointments".to_string());
        routes.insert("updateVehicle".to_string(), "/vehicles/".to_string());
        RemoteConfig {
            base_url: "https://garage.example.com/api/".to_string(),
            request_timeout_secs: 5,
            routes,
        }
    }

    #[test]
    fn endpoint_joins_base_and_collection() {
        let dispatcher = HttpDispatcher::new(&remote_config()).unwrap();

        assert_eq!(
            dispatcher.endpoint("bookAppointment").as_deref(),
            Some("https://garage.example.com/api/appointments")
        );
        assert_eq!(
            dispatcher.endpoint("updateVehicle").as_deref(),
            Some("https://garage.example.com/api/vehicles")
        );
        assert!(dispatcher.endpoint("cancelAppointment").is_none());
    }

    #[tokio::test]
    async fn unrouted_kind_fails_without_request() {
        let dispatcher = HttpDispatcher::new(&remote_config()).unwrap();
        let result = dispatcher.dispatch("cancelAppointment", &json!({})).await;
        assert!(matches!(result, Err(DispatchError::UnknownAction(_))));
    }

    #[tokio::test]
    async fn unreachable_backend_is_http_error() {
        let mut config = remote_config();
        // Port 9 (discard) on loopback is closed on test machines.
        config.base_url = "http://127.0.0.1:9".to_string();
        let dispatcher = HttpDispatcher::new(&config).unwrap();

        let result = dispatcher.dispatch("bookAppointment", &json!({})).await;
        assert!(matches!(result, Err(DispatchError::Http(_))));
    }
}
