//! Sequential reconciliation loop.
//!
//! # Responsibilities
//! - Look up each CSV transaction, one at a time
//! - Compare amounts and record every outcome in the report
//! - Keep going after individual failures
//! - Stop between transactions when shutdown is requested

use std::future::Future;

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::api::{QueryClient, QueryError, QueryResult};
use crate::input::CsvTransaction;
use crate::observability::metrics;
use crate::reconcile::comparator::ReconciliationOutcome;
use crate::reconcile::summary::RunSummary;
use crate::report::ReportWriter;

/// Something that can resolve a transaction ID to an API amount.
pub trait TransactionLookup {
    fn lookup(&self, tx_id: &str) -> impl Future<Output = Result<QueryResult, QueryError>> + Send;
}

impl TransactionLookup for QueryClient {
    fn lookup(&self, tx_id: &str) -> impl Future<Output = Result<QueryResult, QueryError>> + Send {
        self.query(tx_id)
    }
}

/// Drives one reconciliation run.
pub struct Reconciler<L> {
    lookup: L,
    progress_every: usize,
}

impl<L: TransactionLookup> Reconciler<L> {
    pub fn new(lookup: L, progress_every: usize) -> Self {
        Self {
            lookup,
            progress_every: progress_every.max(1),
        }
    }

    /// Reconcile a single CSV row.
    pub async fn reconcile_one(&self, tx: &CsvTransaction) -> ReconciliationOutcome {
        match self.lookup.lookup(&tx.tx_id).await {
            Ok(result) => ReconciliationOutcome::compared(&tx.tx_id, tx.row, tx.amount, result.normalized_amount),
            Err(err) => {
                tracing::warn!(tx_id = %tx.tx_id, row = tx.row, error = %err, "Lookup failed");
                ReconciliationOutcome::failed(&tx.tx_id, tx.row, err.to_string())
            }
        }
    }

    /// Reconcile all rows in order and write the summary.
    ///
    /// Report write failures are logged and do not stop the run.
    pub async fn run(
        &self,
        transactions: &[CsvTransaction],
        report: &mut ReportWriter,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> RunSummary {
        let total = transactions.len();
        let mut summary = RunSummary::new(total);

        for (i, tx) in transactions.iter().enumerate() {
            if shutdown_requested(shutdown) {
                tracing::warn!(processed = i, total, "Shutdown requested, stopping before next transaction");
                summary.interrupted = true;
                break;
            }

            let outcome = self.reconcile_one(tx).await;
            if outcome.is_mismatched() {
                tracing::info!(tx_id = %tx.tx_id, row = tx.row, "Amount mismatch");
            }
            metrics::record_outcome(&outcome);

            if let Err(e) = report.record(&outcome) {
                tracing::error!(tx_id = %tx.tx_id, error = %e, "Failed to write report entry");
            }
            summary.record(&outcome);

            let processed = i + 1;
            if processed % self.progress_every == 0 || processed == total {
                tracing::info!(
                    processed,
                    total,
                    successful = summary.successful,
                    mismatched = summary.mismatched,
                    failed = summary.failed,
                    "Progress"
                );
            }
        }

        if let Err(e) = report.write_summary(&summary) {
            tracing::error!(error = %e, "Failed to write report summary");
        }
        summary
    }
}

fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) -> bool {
    match shutdown.try_recv() {
        Err(TryRecvError::Empty) => false,
        Ok(()) | Err(TryRecvError::Closed) | Err(TryRecvError::Lagged(_)) => true,
    }
}
