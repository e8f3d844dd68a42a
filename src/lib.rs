//! Transaction amount reconciler library.
//!
//! Compares locally recorded transaction amounts (CSV exports) with the
//! amounts a blockchain data API reports for the same transaction IDs.

pub mod api;
pub mod config;
pub mod input;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;
pub mod report;
pub mod resilience;

pub use api::QueryClient;
pub use config::ReconcilerConfig;
pub use lifecycle::Shutdown;
pub use reconcile::{Reconciler, RunSummary};
