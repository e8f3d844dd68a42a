//! Flat-file report of mismatches, failures and run summaries.

pub mod writer;

pub use writer::{ReportError, ReportWriter};
