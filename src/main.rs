//! Transaction Amount Reconciler
//!
//! Reads transaction exports from a directory of CSV files, looks every
//! transaction up in a blockchain data API, and records amount mismatches
//! and lookup failures in an append-only report.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────┐    ┌────────────┐    ┌──────────────────────────────┐
//!   │  input   │───▶│ reconcile  │───▶│ api::QueryClient             │
//!   │ CSV rows │    │  runner    │    │  rate limiter → HTTP → retry │
//!   └──────────┘    └─────┬──────┘    └──────────────┬───────────────┘
//!                         │                          │
//!                         │   ┌──────────────┐       │ payload
//!                         │◀──│ comparator   │◀──────┤
//!                         │   │ (1e-8 tol.)  │   ┌───▼────────┐
//!                         ▼   └──────────────┘   │ normalize  │
//!                   ┌──────────┐                 └────────────┘
//!                   │  report  │  mismatches, failures, summary
//!                   └──────────┘
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Instrument;
use uuid::Uuid;

use tx_reconciler::config::validation::validate_config;
use tx_reconciler::config::{apply_env_overrides, load_config, ConfigError, ReconcilerConfig};
use tx_reconciler::input::CsvSource;
use tx_reconciler::lifecycle::{signals, Shutdown};
use tx_reconciler::observability::{logging, metrics};
use tx_reconciler::report::ReportWriter;
use tx_reconciler::resilience::RateLimiter;
use tx_reconciler::{QueryClient, Reconciler, RunSummary};

#[derive(Parser)]
#[command(name = "tx-reconciler")]
#[command(about = "Reconcile CSV transaction amounts against a blockchain data API", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the CSV exports.
    #[arg(long)]
    csv_dir: Option<String>,

    /// Report file (appended to).
    #[arg(long)]
    log_file: Option<String>,

    /// Chain short name, e.g. btc, eth, bsc.
    #[arg(long)]
    chain: Option<String>,

    /// API endpoint base URL.
    #[arg(long)]
    endpoint: Option<String>,
}

impl Cli {
    fn load(&self) -> Result<ReconcilerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => {
                let mut config = ReconcilerConfig::default();
                apply_env_overrides(&mut config);
                config
            }
        };

        if let Some(dir) = &self.csv_dir {
            config.input.csv_directory = dir.clone();
        }
        if let Some(file) = &self.log_file {
            config.report.log_file = file.clone();
        }
        if let Some(chain) = &self.chain {
            config.api.chain_symbol = chain.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load().context("invalid configuration")?;

    logging::init_tracing(&config.observability);
    tracing::info!("tx-reconciler v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let csv_dir = PathBuf::from(&config.input.csv_directory);
    if !csv_dir.exists() {
        std::fs::create_dir_all(&csv_dir)
            .with_context(|| format!("failed to create data directory {}", csv_dir.display()))?;
        println!("Created data directory: {}", csv_dir.display());
        println!("Put the CSV exports there and run again.");
        return Ok(());
    }

    let transactions = CsvSource::from_config(&config.input)
        .read_all()
        .context("failed to read CSV input")?;
    println!("Loaded {} transactions from {}", transactions.len(), csv_dir.display());

    let limiter = RateLimiter::from_config(&config.rate_limit)?;
    let client = QueryClient::new(&config.api, limiter)?;
    println!("API: {} (chain: {})", config.api.endpoint, config.api.chain_symbol);

    let run_id = Uuid::new_v4();
    let mut report = ReportWriter::open(&config.report.log_file, run_id)?;

    let shutdown = Shutdown::new();
    let mut stop = shutdown.subscribe();
    signals::spawn_interrupt_listener(shutdown.handle());
    println!("Reconciling... press Ctrl+C to stop after the current transaction");

    let reconciler = Reconciler::new(client, config.observability.progress_every);
    let summary = reconciler
        .run(&transactions, &mut report, &mut stop)
        .instrument(tracing::info_span!("run", %run_id))
        .await;

    print_summary(&summary, &config.report.log_file);
    Ok(())
}

fn print_summary(summary: &RunSummary, log_file: &str) {
    println!("\n=== Reconciliation finished ===");
    println!("Total transactions: {}", summary.total);
    println!("Checked: {}", summary.successful);
    println!("  Matched: {}", summary.matched());
    println!("  Amount mismatches: {}", summary.mismatched);
    println!("Query failures: {}", summary.failed);
    if summary.interrupted {
        println!("Interrupted after {} transactions", summary.processed());
    }

    if summary.mismatched > 0 || summary.failed > 0 {
        println!("\nDetails written to: {}", log_file);
    } else if !summary.interrupted {
        println!("\nAll transaction amounts match.");
    }
}
