//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate. Logs go to stderr so stdout stays free for results.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    format!("tx_reconciler={},warn", config.log_level)
}

/// Install the global tracing subscriber. Call once at startup.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(config)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let mut config = ObservabilityConfig::default();
        assert_eq!(default_filter(&config), "tx_reconciler=info,warn");

        config.log_level = "debug".to_string();
        assert_eq!(default_filter(&config), "tx_reconciler=debug,warn");
    }
}
