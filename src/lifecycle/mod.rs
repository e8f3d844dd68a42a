//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (binary):
//!     Load config → Validate → Init logging/metrics → Read CSV → Build client
//!
//! Run:
//!     Reconcile rows one by one → write summary
//!
//! Signals (signals.rs):
//!     SIGINT → shutdown.rs trigger → loop stops before next transaction
//!     second SIGINT → immediate exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
