//! Configuration validation.
//!
//! Serde handles the syntax; this checks value ranges and that the endpoint
//! is a usable URL. All problems are reported at once, not just the first.

use std::fmt;

use url::Url;

use crate::config::schema::ReconcilerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ReconcilerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let endpoint = config.api.endpoint.trim();
    if endpoint.is_empty() {
        errors.push(ValidationError::new("api.endpoint", "must not be empty"));
    } else {
        match Url::parse(endpoint) {
            Ok(url) if url.cannot_be_a_base() => {
                errors.push(ValidationError::new("api.endpoint", "must be a hierarchical http(s) URL"));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::new("api.endpoint", format!("invalid URL: {}", e))),
        }
    }

    if config.api.chain_symbol.trim().is_empty() {
        errors.push(ValidationError::new("api.chain_symbol", "must not be empty"));
    }
    if config.api.request_timeout_secs == 0 {
        errors.push(ValidationError::new("api.request_timeout_secs", "must be greater than zero"));
    }

    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::new("rate_limit.max_requests", "must be at least 1"));
    }
    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::new("rate_limit.window_secs", "must be greater than zero"));
    }

    if config.input.csv_directory.trim().is_empty() {
        errors.push(ValidationError::new("input.csv_directory", "must not be empty"));
    }
    if config.input.tx_id_column.trim().is_empty() {
        errors.push(ValidationError::new("input.tx_id_column", "must not be empty"));
    }
    if config.input.amount_column.trim().is_empty() {
        errors.push(ValidationError::new("input.amount_column", "must not be empty"));
    }

    if config.report.log_file.trim().is_empty() {
        errors.push(ValidationError::new("report.log_file", "must not be empty"));
    }

    if config.observability.progress_every == 0 {
        errors.push(ValidationError::new("observability.progress_every", "must be at least 1"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
