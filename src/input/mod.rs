//! Reconciliation input: locally recorded transactions from CSV exports.

pub mod csv_source;

pub use csv_source::{CsvError, CsvSource, CsvTransaction};
