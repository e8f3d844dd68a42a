//! CSV export reader.
//!
//! Every `*.csv` file in the input directory is read in file-name order.
//! Each file must have a header naming the transaction ID and amount
//! columns; data rows that are too short or whose amount does not parse
//! are skipped with a warning.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::parse_decimal;
use crate::config::InputConfig;

/// One transaction row from a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTransaction {
    pub tx_id: String,
    pub amount: Decimal,
    /// Spreadsheet row number: the header is row 1, first data row is 2.
    pub row: usize,
}

/// Errors reading the CSV input.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no CSV files found in {0}")]
    NoFiles(PathBuf),

    #[error("CSV file {0} is empty")]
    Empty(PathBuf),

    #[error("CSV file {path} is missing required columns '{tx_id_column}' and/or '{amount_column}'")]
    MissingColumns {
        path: PathBuf,
        tx_id_column: String,
        amount_column: String,
    },
}

/// Reads transactions from a directory of CSV exports.
#[derive(Debug, Clone)]
pub struct CsvSource {
    directory: PathBuf,
    tx_id_column: String,
    amount_column: String,
}

impl CsvSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let defaults = InputConfig::default();
        Self {
            directory: directory.into(),
            tx_id_column: defaults.tx_id_column,
            amount_column: defaults.amount_column,
        }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.csv_directory),
            tx_id_column: config.tx_id_column.clone(),
            amount_column: config.amount_column.clone(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Paths of the `*.csv` files in the directory, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>, CsvError> {
        let entries = fs::read_dir(&self.directory).map_err(|source| CsvError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CsvError::Io {
                path: self.directory.clone(),
                source,
            })?;
            let path = entry.path();
            let is_csv = path.extension().map(|ext| ext == "csv").unwrap_or(false);
            if is_csv && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(CsvError::NoFiles(self.directory.clone()));
        }
        Ok(files)
    }

    /// Read every file. Any file-level error aborts the whole read.
    pub fn read_all(&self) -> Result<Vec<CsvTransaction>, CsvError> {
        let mut transactions = Vec::new();
        for path in self.discover()? {
            let rows = self.read_file(&path)?;
            tracing::info!(path = %path.display(), rows = rows.len(), "Read CSV file");
            transactions.extend(rows);
        }
        Ok(transactions)
    }

    /// Read a single CSV file.
    pub fn read_file(&self, path: &Path) -> Result<Vec<CsvTransaction>, CsvError> {
        let csv_err = |source| CsvError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        if headers.is_empty() {
            return Err(CsvError::Empty(path.to_path_buf()));
        }

        let tx_idx = headers.iter().position(|h| h == self.tx_id_column);
        let amount_idx = headers.iter().position(|h| h == self.amount_column);
        let (tx_idx, amount_idx) = match (tx_idx, amount_idx) {
            (Some(tx), Some(amount)) => (tx, amount),
            _ => {
                return Err(CsvError::MissingColumns {
                    path: path.to_path_buf(),
                    tx_id_column: self.tx_id_column.clone(),
                    amount_column: self.amount_column.clone(),
                })
            }
        };

        let mut transactions = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            let row = index + 2;

            let (tx_id, raw_amount) = match (record.get(tx_idx), record.get(amount_idx)) {
                (Some(tx_id), Some(amount)) => (tx_id, amount),
                _ => {
                    tracing::warn!(path = %path.display(), row, "Skipping short row");
                    continue;
                }
            };

            let Some(amount) = parse_decimal(raw_amount) else {
                tracing::warn!(path = %path.display(), row, amount = raw_amount, "Skipping row with invalid amount");
                continue;
            };

            transactions.push(CsvTransaction {
                tx_id: tx_id.to_string(),
                amount,
                row,
            });
        }

        Ok(transactions)
    }
}
