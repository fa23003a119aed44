//! Cancellation coordination for in-flight requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Coordinator for aborting in-flight request suspensions.
///
/// Provides a broadcast channel that every executing call subscribes to,
/// plus a level-triggered flag so calls that start after `trigger` fail
/// fast instead of waiting for a signal that already fired.
#[derive(Debug, Clone)]
pub struct Cancellation {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,

    /// Set once, never cleared.
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    /// Create a new cancellation coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to the cancellation signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger cancellation for all current and future subscribers.
    pub fn trigger(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.tx.send(());
    }

    /// Whether cancellation has been triggered.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}
