//! Logging configuration

use serde::{Deserialize, Serialize};

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info");
        assert!(!config.json);
    }

    #[test]
    fn deserialize_partial() {
        let config: LoggingConfig = toml::from_str("json = true").unwrap();
        assert!(config.json);
        assert_eq!(config.filter, "info");
    }
}
