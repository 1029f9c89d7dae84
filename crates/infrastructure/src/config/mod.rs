//! Application configuration
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - a TOML file (`config.toml` in the working directory, or `--config`)
//! - environment variables prefixed `NSW_TRANSPORT__`, nested keys joined
//!   with `__` (e.g. `NSW_TRANSPORT__TRANSIT__TIMEOUT_SECS=5`)

mod logging;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use application::PollRequest;
use chrono_tz::Tz;
use domain::entities::TripConfig;
use domain::time::parse_timezone;
use integration_transit::TransitConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub use logging::LoggingConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "NSW_TRANSPORT";

/// Separator between the prefix and nested key segments
pub const ENV_SEPARATOR: &str = "__";

/// Default configuration file name, without extension
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Errors raised while loading or checking configuration
#[derive(Debug, Error)]
pub enum AppConfigError {
    /// Sources could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration loaded but is unusable
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Main application configuration
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// TfNSW Open Data API key
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Seconds between poll ticks
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,

    /// Departure cap for trips without their own
    #[serde(default = "default_max_departures")]
    pub default_max_departures: usize,

    /// Route description keywords that exclude a departure
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// Verbose logging and raw response dumps
    #[serde(default)]
    pub debug: bool,

    /// IANA timezone departures are computed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Departure monitor client settings
    #[serde(default)]
    pub transit: TransitConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Monitored stations and stops
    #[serde(default)]
    pub trips: Vec<TripConfig>,
}

const fn default_update_interval_secs() -> u64 {
    60
}

const fn default_max_departures() -> usize {
    application::DEFAULT_MAX_DEPARTURES
}

fn default_timezone() -> String {
    domain::TRANSIT_TIMEZONE.name().to_string()
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("update_interval_secs", &self.update_interval_secs)
            .field("default_max_departures", &self.default_max_departures)
            .field("exclude_keywords", &self.exclude_keywords)
            .field("debug", &self.debug)
            .field("timezone", &self.timezone)
            .field("transit", &self.transit)
            .field("logging", &self.logging)
            .field("trips", &self.trips)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            update_interval_secs: default_update_interval_secs(),
            default_max_departures: default_max_departures(),
            exclude_keywords: Vec::new(),
            debug: false,
            timezone: default_timezone(),
            transit: TransitConfig::default(),
            logging: LoggingConfig::default(),
            trips: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, AppConfigError> {
        Self::load_with(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// Load configuration from an explicit TOML file and the environment
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, AppConfigError> {
        Self::load_with(
            config::File::from(path.to_path_buf())
                .format(config::FileFormat::Toml)
                .required(true),
        )
    }

    fn load_with<S>(file: S) -> Result<Self, AppConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            .set_default("update_interval_secs", 60_i64)?
            .set_default("timezone", default_timezone())?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("exclude_keywords"),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(trips = config.trips.len(), "Configuration loaded");
        Ok(config)
    }

    /// Check the configuration, collecting every problem
    pub fn validate(&self) -> Result<(), AppConfigError> {
        let mut problems = Vec::new();

        if self
            .api_key
            .as_ref()
            .is_none_or(|k| k.expose_secret().trim().is_empty())
        {
            problems.push("api_key is required".to_string());
        }
        if self.update_interval_secs == 0 {
            problems.push("update_interval_secs must be greater than 0".to_string());
        }
        if let Err(e) = self.transit.validate() {
            problems.push(format!("transit: {e}"));
        }
        if let Err(e) = self.timezone() {
            problems.push(e.to_string());
        }

        let mut keys = HashSet::new();
        for (index, trip) in self.trips.iter().enumerate() {
            if let Err(e) = trip.identifier() {
                problems.push(format!("trips[{index}]: {e}"));
                continue;
            }
            if let Ok(key) = trip.key() {
                if !keys.insert(key.clone()) {
                    problems.push(format!(
                        "trips[{index}]: duplicate trip key '{key}', set a unique id"
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppConfigError::Invalid(problems))
        }
    }

    /// Configured timezone
    pub fn timezone(&self) -> Result<Tz, domain::DomainError> {
        parse_timezone(&self.timezone)
    }

    /// Poll period
    #[must_use]
    pub const fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    /// Build the request every poll tick runs with
    pub fn poll_request(&self) -> Result<PollRequest, AppConfigError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| AppConfigError::Invalid(vec!["api_key is required".to_string()]))?;

        Ok(PollRequest::new(api_key, self.trips.clone())
            .with_exclude_keywords(self.exclude_keywords.iter().cloned())
            .with_debug(self.debug)
            .with_default_max_departures(self.default_max_departures))
    }
}
