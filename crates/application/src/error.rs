//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The transit API could not be reached (connection, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The transit API answered with an error status or an unreadable body
    #[error("API error: {0}")]
    Api(String),

    /// The poll could not be set up, no trip was fetched
    #[error("Aggregation error: {0}")]
    Aggregation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A result sink rejected the outcome
    #[error("Publish error: {0}")]
    Publish(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// Nothing is retried within a tick; this only tells the next tick
    /// apart from a permanent misconfiguration in the logs.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(ApplicationError::Network("refused".into()).is_retryable());
        assert!(ApplicationError::Api("HTTP 503".into()).is_retryable());
        assert!(!ApplicationError::Aggregation("no api key".into()).is_retryable());
        assert!(!ApplicationError::Configuration("bad".into()).is_retryable());
    }

    #[test]
    fn domain_errors_are_transparent() {
        let err: ApplicationError = DomainError::MalformedEvent("missing planned".into()).into();
        assert_eq!(err.to_string(), "Malformed stop event: missing planned");
        assert!(!err.is_retryable());
    }

    #[test]
    fn aggregation_error_message() {
        let err = ApplicationError::Aggregation("duplicate trip key 'central'".into());
        assert_eq!(
            err.to_string(),
            "Aggregation error: duplicate trip key 'central'"
        );
    }
}
