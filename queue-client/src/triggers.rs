//! Sync triggers.
//!
//! A sync pass runs when connectivity comes back and when the platform's
//! background-sync facility fires. [`register_triggers`] wires both up once
//! at startup.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::dispatch::Dispatcher;
use crate::queue::OfflineQueue;
use crate::store::QueueStore;

/// Tag registered with the platform background-sync facility.
pub const BACKGROUND_SYNC_TAG: &str = "sync-queued-actions";

/// Background-sync registration errors.
#[derive(Debug, Error)]
pub enum BackgroundSyncError {
    /// The platform has no background-sync facility.
    #[error("background sync is not supported on this platform")]
    Unsupported,

    /// The platform refused the registration.
    #[error("background sync registration failed: {0}")]
    Registration(String),
}

/// Platform background-sync facility.
///
/// When a registered tag fires, the host calls
/// [`OfflineQueue::on_background_sync`] with it.
#[async_trait]
pub trait BackgroundSync: Send + Sync {
    /// Ask the platform to fire `tag` when it next sees connectivity.
    async fn register(&self, tag: &str) -> Result<(), BackgroundSyncError>;
}

/// Handle to the installed triggers.
#[derive(Debug)]
pub struct TriggerHandle {
    listener: JoinHandle<()>,
    background_tag: Option<String>,
}

impl TriggerHandle {
    /// Check if background sync was registered.
    pub fn background_registered(&self) -> bool {
        self.background_tag.is_some()
    }

    /// The registered background-sync tag, if any.
    pub fn background_tag(&self) -> Option<&str> {
        self.background_tag.as_deref()
    }

    /// Stop listening for connectivity changes.
    pub async fn shutdown(self) {
        self.listener.abort();
        // Cancelled is the expected outcome.
        let _ = self.listener.await;
    }
}

/// Install the sync triggers for `queue`.
///
/// Spawns a listener that runs a sync pass on every offline to online
/// transition. If `background` is given, the queue's tag is registered with
/// it; a registration failure is logged and the connectivity trigger alone
/// remains.
pub async fn register_triggers<S, D>(
    queue: Arc<OfflineQueue<S, D>>,
    background: Option<&dyn BackgroundSync>,
) -> TriggerHandle
where
    S: QueueStore + 'static,
    D: Dispatcher + 'static,
{
    let mut rx = queue.connectivity().subscribe();
    let mut was_online = *rx.borrow_and_update();

    let listener_queue = Arc::clone(&queue);
    let listener = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let online = *rx.borrow_and_update();
            let came_online = online && !was_online;
            was_online = online;

            if !came_online {
                continue;
            }

            tracing::info!("Connectivity restored, syncing queued actions");
            if let Err(e) = listener_queue.sync().await {
                tracing::error!("Sync after reconnect failed: {}", e);
            }
        }
        tracing::debug!("Connectivity signal closed, trigger listener exiting");
    });

    let background_tag = match background {
        Some(facility) => {
            let tag = queue.background_tag();
            match facility.register(tag).await {
                Ok(()) => {
                    tracing::debug!("Registered background sync tag {}", tag);
                    Some(tag.to_string())
                }
                Err(e) => {
                    tracing::debug!("Background sync unavailable: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    TriggerHandle {
        listener,
        background_tag,
    }
}
