//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! CsvTransaction { tx_id, amount, row }
//!     → runner.rs (one lookup at a time through TransactionLookup)
//!     → comparator.rs (|csv - api| <= 1e-8 → Matched, else Mismatched)
//!     → ReconciliationOutcome → report writer
//!     → summary.rs (total / successful / mismatched / failed)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential; the limiter is the only shared state
//! - A failed lookup is an outcome, never an abort
//! - Shutdown is honored between transactions, not mid-request

pub mod comparator;
pub mod runner;
pub mod summary;

pub use comparator::{compare, tolerance, OutcomeKind, ReconciliationOutcome, Verdict};
pub use runner::{Reconciler, TransactionLookup};
pub use summary::RunSummary;
