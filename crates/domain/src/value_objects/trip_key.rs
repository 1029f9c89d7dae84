//! Trip key value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key under which a trip's departures are published
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripKey(String);

impl TripKey {
    /// Create a new trip key
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TripKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TripKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}
