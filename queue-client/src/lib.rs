//! # queue-client
//!
//! Offline action queue and sync engine for the Pitstop garage app.
//!
//! Writes the user makes while offline are captured as queued actions in a
//! durable local store and replayed against the backend once connectivity
//! returns.
//!
//! ## Features
//!
//! - **Durable Storage**: SQLite-backed store survives restarts
//! - **Bounded Retries**: Each action gets a fixed number of attempts
//! - **Retention**: Records older than the retention window are purged
//! - **Pluggable Dispatch**: Handlers, HTTP, or mock
//! - **Pure Policy**: Uses queue-core for side-effect-free retry logic
//!
//! ## Example
//!
//! ```ignore
//! use pitstop_queue_client::{Connectivity, HttpDispatcher, OfflineQueue, SqliteQueueStore};
//!
//! let store = SqliteQueueStore::open(&config.storage.database).await?;
//! let dispatcher = HttpDispatcher::new(&config.remote)?;
//! let queue = Arc::new(
//!     OfflineQueue::new(store, dispatcher, Connectivity::offline()).with_config(&config.sync),
//! );
//!
//! queue.enqueue("bookAppointment", json!({"service": "Oil Change"})).await?;
//!
//! // Sync automatically when connectivity returns
//! let triggers = register_triggers(Arc::clone(&queue), None).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connectivity;
pub mod dispatch;
pub mod error;
pub mod queue;
pub mod store;
pub mod triggers;

pub use config::{Config, ConfigError, RemoteConfig, StorageConfig, SyncConfig};
pub use connectivity::Connectivity;
pub use dispatch::{DispatchError, Dispatcher, HandlerRegistry, HttpDispatcher, MockDispatcher};
pub use error::{QueueError, Result, StorageError, StorageResult};
pub use queue::{OfflineQueue, DEFAULT_DISPATCH_TIMEOUT};
pub use store::{MemoryQueueStore, QueueStore, SqliteQueueStore};
pub use triggers::{
    register_triggers, BackgroundSync, BackgroundSyncError, TriggerHandle, BACKGROUND_SYNC_TAG,
};

pub use pitstop_queue_core::{QueueEvent, QueueStats, SkipReason, SyncReport};
pub use pitstop_queue_types::{ActionId, ActionStatus, QueuedAction, Timestamp};
