//! Inbound poll request
//!
//! A `PollRequest` carries everything one poll tick needs: the credential,
//! the monitored trips and the global filtering options. It is built by the
//! infrastructure layer from configuration and handed to the aggregator on
//! every tick.
//!
//! # Examples
//!
//! ```
//! use application::PollRequest;
//! use domain::TripConfig;
//! use secrecy::SecretString;
//!
//! let request = PollRequest::new(
//!     SecretString::from("my-api-key"),
//!     vec![TripConfig::train("2000274").with_max_departures(2)],
//! )
//! .with_exclude_keywords(["Special"]);
//!
//! assert_eq!(request.default_max_departures, 5);
//! assert_eq!(request.trips[0].max_departures_or(request.default_max_departures), 2);
//! ```

use std::collections::HashSet;

use domain::entities::TripConfig;
use domain::value_objects::TripKey;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ApplicationError;

/// Departure cap used when neither the trip nor the request sets one
pub const DEFAULT_MAX_DEPARTURES: usize = 5;

/// Everything one poll tick needs
///
/// `Debug` output redacts the API key.
#[derive(Debug, Clone)]
pub struct PollRequest {
    /// TfNSW Open Data API key
    pub api_key: SecretString,
    /// Monitored trips, in display order
    pub trips: Vec<TripConfig>,
    /// Route description keywords that exclude a departure
    pub exclude_keywords: Vec<String>,
    /// Verbose logging and raw response dumps
    pub debug: bool,
    /// Cap for trips without their own `max_departures`
    pub default_max_departures: usize,
}

/// A trip that passed validation, with its resolved key and lookup identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTrip<'a> {
    /// Key the result is published under
    pub key: TripKey,
    /// Station or stop identifier sent to the API
    pub identifier: &'a str,
    /// The configured trip
    pub trip: &'a TripConfig,
}

impl PollRequest {
    /// Create a request with default options
    #[must_use]
    pub fn new(api_key: SecretString, trips: Vec<TripConfig>) -> Self {
        Self {
            api_key,
            trips,
            exclude_keywords: Vec::new(),
            debug: false,
            default_max_departures: DEFAULT_MAX_DEPARTURES,
        }
    }

    /// Set the exclusion keywords
    #[must_use]
    pub fn with_exclude_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable debug mode
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the default departure cap, zero keeps the built-in default
    #[must_use]
    pub const fn with_default_max_departures(mut self, max: usize) -> Self {
        if max > 0 {
            self.default_max_departures = max;
        }
        self
    }

    /// Departure cap for `trip`
    #[must_use]
    pub fn cap_for(&self, trip: &TripConfig) -> usize {
        trip.max_departures_or(self.default_max_departures.max(1))
    }

    /// Validate the request and resolve every trip's key
    ///
    /// Runs before any fetch. Keys must be unique across the request; a
    /// collision is reported instead of letting one trip overwrite another.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::Aggregation`] for a blank API key, a trip without
    /// its identifier, or a duplicate key.
    ///
    /// ```
    /// use application::PollRequest;
    /// use domain::TripConfig;
    /// use secrecy::SecretString;
    ///
    /// let request = PollRequest::new(
    ///     SecretString::from("k"),
    ///     vec![TripConfig::train("2000274"), TripConfig::train("2000274")],
    /// );
    /// assert!(request.plan().is_err());
    /// ```
    pub fn plan(&self) -> Result<Vec<PlannedTrip<'_>>, ApplicationError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ApplicationError::Aggregation(
                "no API key configured".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.trips.len());
        let mut planned = Vec::with_capacity(self.trips.len());

        for trip in &self.trips {
            let identifier = trip
                .identifier()
                .map_err(|e| ApplicationError::Aggregation(e.to_string()))?;
            let key = trip
                .key()
                .map_err(|e| ApplicationError::Aggregation(e.to_string()))?;

            if !seen.insert(key.clone()) {
                return Err(ApplicationError::Aggregation(format!(
                    "duplicate trip key '{key}', give each trip a unique id"
                )));
            }

            planned.push(PlannedTrip {
                key,
                identifier,
                trip,
            });
        }

        Ok(planned)
    }
}
