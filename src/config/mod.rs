//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → CLI flags (binary only)
//!     → validation.rs (semantic checks)
//!     → ReconcilerConfig (validated, immutable)
//!     → injected into the limiter, client, CSV source and report writer
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; running without a file is supported
//! - The API key may come from the environment and is never serialized
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{
    ApiConfig, InputConfig, ObservabilityConfig, RateLimitConfig, ReconcilerConfig, ReportConfig,
};
