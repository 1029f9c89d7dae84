//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A stop event is missing a required field or carries an unreadable one
    #[error("Malformed stop event: {0}")]
    MalformedEvent(String),

    /// A configured trip cannot be monitored as written
    #[error("Invalid trip '{trip}': {reason}")]
    InvalidTripConfig {
        /// Trip key or best available description
        trip: String,
        /// What is wrong with it
        reason: String,
    },

    /// Unknown IANA timezone name
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

impl DomainError {
    /// Create an invalid trip configuration error
    pub fn invalid_trip(trip: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTripConfig {
            trip: trip.into(),
            reason: reason.into(),
        }
    }
}
