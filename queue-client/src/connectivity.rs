//! Connectivity signal.
//!
//! A shared online/offline flag that can be read on demand and observed for
//! changes. The host application feeds it from whatever the platform offers
//! (network change callbacks, health probes).

use std::sync::Arc;
use tokio::sync::watch;

/// Shared online/offline flag.
///
/// Clones observe and update the same flag.
#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    /// Create a signal with the given initial state.
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    /// Create a signal that starts online.
    pub fn online() -> Self {
        Self::new(true)
    }

    /// Create a signal that starts offline.
    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Current state.
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the state. Subscribers are only woken on an actual change.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_current_state() {
        let connectivity = Connectivity::offline();
        assert!(!connectivity.is_online());

        connectivity.set_online(true);
        assert!(connectivity.is_online());
    }

    #[test]
    fn clones_share_state() {
        let connectivity = Connectivity::online();
        let other = connectivity.clone();

        other.set_online(false);
        assert!(!connectivity.is_online());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let connectivity = Connectivity::offline();
        let mut rx = connectivity.subscribe();

        connectivity.set_online(true);

        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
    }

    #[test]
    fn setting_same_state_does_not_notify() {
        let connectivity = Connectivity::online();
        let rx = connectivity.subscribe();

        connectivity.set_online(true);

        assert!(!rx.has_changed().unwrap());
    }
}
