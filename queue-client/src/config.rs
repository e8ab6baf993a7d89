//! Configuration loading for the offline queue.
//!
//! Configuration is loaded from a TOML file (default: `pitstop.toml`).
//! Every section and field is optional.

use pitstop_queue_core::{RetentionWindow, RetryPolicy};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::triggers::BACKGROUND_SYNC_TAG;

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset (default: info).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Sync policy configuration.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Remote backend configuration.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
}

/// Sync policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Failed attempts before an action is marked failed (default: 3, minimum: 1).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Records older than this are purged after each pass (default: 7 days).
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
    /// Upper bound on a single remote dispatch (default: 30).
    #[serde(default = "default_dispatch_timeout_secs")]
    pub dispatch_timeout_secs: u64,
    /// Tag registered with the platform background-sync facility.
    #[serde(default = "default_background_sync_tag")]
    pub background_sync_tag: String,
}

/// Remote backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the document-store API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP request timeout in seconds (default: 15).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Action kind to collection name.
    #[serde(default = "default_routes")]
    pub routes: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("pitstop-queue.db")
}

fn default_max_retries() -> u32 {
    pitstop_queue_core::DEFAULT_MAX_RETRIES
}

fn default_retention_secs() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

fn default_dispatch_timeout_secs() -> u64 {
    30
}

fn default_background_sync_tag() -> String {
    BACKGROUND_SYNC_TAG.to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_routes() -> HashMap<String, String> {
    let mut routes = HashMap::new();
    routes.insert("bookAppointment".to_string(), "appointments".to_string());
    routes
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retention_secs: default_retention_secs(),
            dispatch_timeout_secs: default_dispatch_timeout_secs(),
            background_sync_tag: default_background_sync_tag(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            routes: default_routes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            sync: SyncConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Retry policy for this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
    }

    /// Retention window for this configuration.
    pub fn retention(&self) -> RetentionWindow {
        RetentionWindow::new(Duration::from_secs(self.retention_secs))
    }

    /// Dispatch timeout for this configuration.
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_queue_policy() {
        let config = Config::default();
        assert_eq!(config.sync.max_retries, 3);
        assert_eq!(config.sync.retention_secs, 7 * 24 * 60 * 60);
        assert_eq!(config.sync.background_sync_tag, "sync-queued-actions");
        assert_eq!(config.storage.database, PathBuf::from("pitstop-queue.db"));
        assert_eq!(
            config.remote.routes.get("bookAppointment").map(String::as_str),
            Some("appointments")
        );
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
log_level = "debug"

[storage]
database = "/var/lib/pitstop/queue.db"

[sync]
max_retries = 5
dispatch_timeout_secs = 10

[remote]
base_url = "https://garage.example.com/api"

[remote.routes]
bookAppointment = "appointments"
updateVehicle = "vehicles"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.storage.database,
            PathBuf::from("/var/lib/pitstop/queue.db")
        );
        assert_eq!(config.sync.retry_policy().max_retries(), 5);
        assert_eq!(config.sync.dispatch_timeout(), Duration::from_secs(10));
        assert_eq!(config.remote.routes.len(), 2);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sync.max_retries, 3);
        assert_eq!(config.remote.request_timeout_secs, 15);
        assert_eq!(config.sync.retention(), RetentionWindow::default());
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = Config::from_file(std::path::Path::new("/nonexistent/pitstop.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitstop.toml");
        std::fs::write(&path, "[sync]\nmax_retries = \"many\"\n").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
