//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ReconcilerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the API key.
pub const API_KEY_ENV_VAR: &str = "RECONCILER_API_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load a TOML file, apply environment overrides, and validate.
pub fn load_config(path: &Path) -> Result<ReconcilerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parse TOML text without validating.
pub fn parse_config(content: &str) -> Result<ReconcilerConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Take secrets from the environment. The key itself is never logged.
pub fn apply_env_overrides(config: &mut ReconcilerConfig) {
    if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
        if !key.trim().is_empty() {
            config.api.api_key = key.trim().to_string();
        }
    }
}
