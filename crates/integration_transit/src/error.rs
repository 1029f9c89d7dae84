//! Transit error types

use thiserror::Error;

/// Errors that can occur while querying the departure monitor
#[derive(Debug, Error)]
pub enum TransitError {
    /// Connection to the transit API failed (DNS, refused, reset)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The API answered with a non-success status
    #[error("Request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse response from the transit API
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl TransitError {
    /// Whether the API could not be reached at all
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout { .. })
    }

    /// Returns true if a later attempt may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::RateLimitExceeded { .. } => {
                true
            },
            Self::RequestFailed { status } => *status >= 500,
            Self::ParseError(_) | Self::ConfigurationError(_) => false,
        }
    }
}
