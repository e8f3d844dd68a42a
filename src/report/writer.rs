//! Append-only reconciliation report.
//!
//! Only mismatches and failures are written; matched rows leave no trace in
//! the file. Each run starts with a header and ends with a summary block.
//! Every block is flushed as soon as it is written so an interrupted run
//! keeps what it already found.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use uuid::Uuid;

use crate::reconcile::comparator::{OutcomeKind, ReconciliationOutcome};
use crate::reconcile::summary::RunSummary;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors writing the report file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to open report file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),
}

/// Writer for the flat-file report.
pub struct ReportWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl ReportWriter {
    /// Open (or create) the report in append mode and write the run header.
    pub fn open(path: impl AsRef<Path>, run_id: Uuid) -> Result<Self, ReportError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ReportError::Open {
                path: path.clone(),
                source,
            })?;

        let mut writer = Self {
            path,
            out: BufWriter::new(file),
        };
        writer.write_header(run_id, Local::now())?;
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_header(&mut self, run_id: Uuid, started_at: DateTime<Local>) -> Result<(), ReportError> {
        write!(
            self.out,
            "\n=== Reconciliation log, started {} (run {}) ===\n\n",
            started_at.format(TIME_FORMAT),
            run_id
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Record one outcome. Matched outcomes are not written.
    pub fn record(&mut self, outcome: &ReconciliationOutcome) -> Result<(), ReportError> {
        match &outcome.kind {
            OutcomeKind::Matched { .. } => return Ok(()),
            OutcomeKind::Mismatched {
                csv_amount,
                api_amount,
                difference,
            } => {
                writeln!(self.out, "[AMOUNT MISMATCH]")?;
                writeln!(self.out, "  Transaction ID: {}", outcome.tx_id)?;
                writeln!(self.out, "  CSV amount: {:.8}", csv_amount)?;
                writeln!(self.out, "  API amount: {:.8}", api_amount)?;
                writeln!(self.out, "  Difference: {:.8}", difference)?;
            }
            OutcomeKind::Failed { reason } => {
                writeln!(self.out, "[QUERY FAILED]")?;
                writeln!(self.out, "  Transaction ID: {}", outcome.tx_id)?;
                writeln!(self.out, "  Reason: {}", reason)?;
            }
        }
        writeln!(self.out, "  Row: {}", outcome.row)?;
        writeln!(self.out, "  Checked at: {}\n", outcome.checked_at.format(TIME_FORMAT))?;
        self.out.flush()?;
        Ok(())
    }

    /// Write the end-of-run summary block.
    pub fn write_summary(&mut self, summary: &RunSummary) -> Result<(), ReportError> {
        writeln!(self.out, "\n=== Reconciliation finished ===")?;
        writeln!(self.out, "Total transactions: {}", summary.total)?;
        writeln!(self.out, "Checked: {}", summary.successful)?;
        writeln!(self.out, "Amount mismatches: {}", summary.mismatched)?;
        writeln!(self.out, "Query failures: {}", summary.failed)?;
        if let Some(rate) = summary.match_rate() {
            writeln!(self.out, "Match rate: {:.2}%", rate)?;
        }
        if summary.interrupted {
            writeln!(self.out, "Interrupted after {} transactions", summary.processed())?;
        }
        writeln!(self.out, "Finished at: {}\n", Local::now().format(TIME_FORMAT))?;
        self.out.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for ReportWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportWriter").field("path", &self.path).finish()
    }
}
