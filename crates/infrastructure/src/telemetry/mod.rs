//! Logging setup
//!
//! Installs a `tracing` subscriber: `RUST_LOG` wins over the configured
//! filter, output goes to stderr (stdout carries published outcomes) and is
//! either human-readable or JSON lines.

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive did not parse
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Offending directive
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber was already installed
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// Build the filter, preferring `RUST_LOG` over `fallback`
pub fn build_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|e| TelemetryError::InvalidFilter {
        filter: fallback.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.filter)?;

    let (plain, json) = if config.json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(filter = %config.filter, json = config.json, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_rejected() {
        // RUST_LOG may be set in CI, only check when it is not
        if std::env::var_os("RUST_LOG").is_none() {
            let err = build_filter("integration_transit=loudest").unwrap_err();
            assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
        }
    }

    #[test]
    fn valid_filter_builds() {
        assert!(build_filter("warn,integration_transit=debug").is_ok());
    }
}
