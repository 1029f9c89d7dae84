//! Monitored transport mode

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport mode of a monitored trip
///
/// Trains are looked up by platform/station, buses by stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripKind {
    /// Train service, queried by station or platform
    Train,
    /// Bus service, queried by stop
    Bus,
}

impl TripKind {
    /// Lowercase label, also used in diagnostic file names
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Bus => "bus",
        }
    }
}

impl fmt::Display for TripKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TripKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "bus" => Ok(Self::Bus),
            _ => Err(format!("Invalid trip type: {s}. Use 'train' or 'bus'")),
        }
    }
}
