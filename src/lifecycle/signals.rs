//! OS signal handling.
//!
//! The first Ctrl-C asks the run to stop before its next transaction; the
//! summary is still written. A second Ctrl-C exits immediately.

use tokio::sync::broadcast;

/// Exit status used when a second interrupt forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Spawn a task translating Ctrl-C into a shutdown trigger.
pub fn spawn_interrupt_listener(shutdown: broadcast::Sender<()>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        tracing::warn!("Interrupt received, finishing the current transaction");
        let _ = shutdown.send(());

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::error!("Second interrupt received, exiting immediately");
            std::process::exit(FORCED_EXIT_CODE);
        }
    })
}
