//! Shutdown coordination for a reconciliation run.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The run loop holds a receiver and checks it before each transaction, so
/// a request in flight always completes and gets recorded.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Sender handle for signal listeners running on other tasks.
    pub fn handle(&self) -> broadcast::Sender<()> {
        self.tx.clone()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
