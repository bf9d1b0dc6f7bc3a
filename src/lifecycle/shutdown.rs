//! Shutdown coordination for the fixture server.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Hands out broadcast receivers that long-running tasks wait on.
/// Integration tests use it to tear a spawned server down; the binary
/// wires it to Ctrl+C.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
