//! Wire types and error definitions for the transaction lookup API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resilience::RateLimiterError;

/// Error text fragments that mark a failure as worth retrying.
pub const TRANSIENT_PATTERNS: [&str; 3] = ["timeout", "deadline exceeded", "connection refused"];

/// Response envelope: `{code, msg, data}`. `code == 1` means success.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub code: i64,

    #[serde(default)]
    pub msg: String,

    #[serde(default, rename = "enMsg")]
    pub en_msg: String,

    #[serde(default)]
    pub data: Option<RawTransferRecord>,
}

/// The part of a transaction payload relevant to amount normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransferRecord {
    #[serde(default)]
    pub txid: String,

    /// Native-coin value as decimal text.
    #[serde(default)]
    pub value: String,

    #[serde(default, rename = "tokenTransfer")]
    pub token_transfers: Option<Vec<TokenTransfer>>,
}

impl RawTransferRecord {
    /// Token transfers in payload order; a `null` list reads as empty.
    pub fn token_transfers(&self) -> &[TokenTransfer] {
        self.token_transfers.as_deref().unwrap_or(&[])
    }
}

/// One token transfer inside a transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenTransfer {
    /// Raw integer amount in the token's smallest unit.
    #[serde(default)]
    pub value: String,

    /// Number of decimal places of the token, as text.
    #[serde(default, rename = "tokenDecimals")]
    pub decimals: String,

    #[serde(default, rename = "tokenSymbol")]
    pub symbol: Option<String>,

    #[serde(default, rename = "tokenAddr")]
    pub token_address: Option<String>,
}

/// Status of a lookup that produced an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Success,
}

/// A successful lookup: the normalized amount for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub transaction_id: String,
    pub normalized_amount: Decimal,
    pub status: QueryStatus,
}

impl QueryResult {
    pub fn success(transaction_id: impl Into<String>, normalized_amount: Decimal) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            normalized_amount,
            status: QueryStatus::Success,
        }
    }
}

/// A monetary field that could not be read as a number.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to parse {field}: {raw:?}")]
pub struct AmountParseError {
    /// Which payload field was malformed.
    pub field: &'static str,
    /// The text as received.
    pub raw: String,
}

impl AmountParseError {
    pub fn new(field: &'static str, raw: &str) -> Self {
        Self {
            field,
            raw: raw.to_string(),
        }
    }
}

/// Errors that can occur during a transaction lookup.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The request could not be built (bad ID, unusable endpoint).
    #[error("failed to build request: {0}")]
    RequestConstruction(String),

    /// Sending the request or reading the response failed.
    #[error("API request failed: {message}")]
    Network { message: String, transient: bool },

    /// The API answered with a non-2xx status.
    #[error("API returned status {code}, body: {body}")]
    HttpStatus { code: u16, body: String },

    /// The body was not a valid envelope.
    #[error("failed to decode response: {message}, body: {body}")]
    Decode { message: String, body: String },

    /// The envelope carried an application error code.
    #[error("API returned error: code={code}, msg={message}")]
    Api { code: i64, message: String },

    /// The payload's amount fields were malformed.
    #[error(transparent)]
    AmountParse(#[from] AmountParseError),
}

impl QueryError {
    /// Classify a transport error from the HTTP stack.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        let transient = err.is_timeout() || is_transient_transport(&err);
        QueryError::Network { message, transient }
    }

    /// Whether a retry may succeed where this attempt failed.
    ///
    /// Network errors carry their own classification. Anything else is
    /// permanent unless its text names a timeout or refused connection.
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Network { transient, .. } => *transient,
            other => matches_transient_pattern(&other.to_string()),
        }
    }
}

/// Default retry classifier for lookups.
pub fn is_transient(err: &QueryError) -> bool {
    err.is_transient()
}

fn matches_transient_pattern(text: &str) -> bool {
    let text = text.to_lowercase();
    TRANSIENT_PATTERNS.iter().any(|pattern| text.contains(pattern))
}

/// Whether a transport failure is a timeout or a refused connection.
///
/// Other connect-phase failures (DNS resolution, TLS handshake) are
/// permanent.
fn is_transient_transport(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::TimedOut
            ) {
                return true;
            }
        }
        if matches_transient_pattern(&cause.to_string()) {
            return true;
        }
        current = cause.source();
    }
    false
}

/// Render an error with all of its sources, outermost first.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

/// Result type for lookup operations.
pub type QueryOutcome<T> = Result<T, QueryError>;

/// Errors building a client from configuration.
#[derive(Debug, Error)]
pub enum ClientConfigError {
    #[error("invalid rate limit: {0}")]
    RateLimit(#[from] RateLimiterError),

    #[error("invalid endpoint '{endpoint}': {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
