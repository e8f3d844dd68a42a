//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a
//! reconciliation run. All types derive Serde traits for deserialization
//! from config files, and every section has defaults so a missing file or
//! an empty one is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the reconciler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Transaction lookup API settings.
    pub api: ApiConfig,

    /// Provider quota.
    pub rate_limit: RateLimitConfig,

    /// Where the CSV exports live and which columns to read.
    pub input: InputConfig,

    /// Mismatch/failure report file.
    pub report: ReportConfig,

    /// Logging, metrics and progress settings.
    pub observability: ObservabilityConfig,
}

/// Transaction lookup API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base endpoint; requests go to `{endpoint}/{chain_symbol}/{txid}`.
    pub endpoint: String,

    /// API key sent as the `apikey` query parameter.
    ///
    /// Prefer the `RECONCILER_API_KEY` environment variable over the file.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Chain short name, e.g. "btc", "eth", "bsc", "trx".
    pub chain_symbol: String,

    /// Per-attempt request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://services.tokenview.io/vipapi/tx".to_string(),
            api_key: String::new(),
            chain_symbol: "bsc".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Sliding-window quota configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum requests in any rolling window.
    pub max_requests: usize,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 299,
            window_secs: 60,
        }
    }
}

/// CSV input configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for `*.csv` files.
    pub csv_directory: String,

    /// Header of the transaction ID column.
    pub tx_id_column: String,

    /// Header of the amount column.
    pub amount_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            csv_directory: "./data".to_string(),
            tx_id_column: "tx_id".to_string(),
            amount_column: "amount".to_string(),
        }
    }
}

/// Report file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Append-only log of mismatches, failures and run summaries.
    pub log_file: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_file: "./mismatch.log".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Log progress every N transactions.
    pub progress_every: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
            progress_every: 10,
        }
    }
}
