//! Normalized departures

use std::fmt;

use serde::{Deserialize, Serialize};

/// One upcoming departure, ready for display
///
/// `actual_time` equals `scheduled_time` unless the API supplied a real-time
/// estimate. `delay_minutes` never goes below zero; `minutes_to_arrival` is
/// negative once the departure has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    /// Destination name, `"Unknown"` when the API gave none
    pub destination: String,
    /// Planned departure, `HH:mm` local time
    pub scheduled_time: String,
    /// Estimated departure if known, else planned, `HH:mm` local time
    pub actual_time: String,
    /// Whole minutes late, early running clamped to zero
    pub delay_minutes: u32,
    /// Whole minutes from now until the actual departure
    pub minutes_to_arrival: i64,
    /// Route number, empty when absent
    pub route_number: String,
    /// Route id, mirrors the route number
    pub route_id: String,
}

impl Departure {
    /// Destination used when the API omits one
    pub const UNKNOWN_DESTINATION: &'static str = "Unknown";

    /// Whether the service runs late
    #[must_use]
    pub const fn is_delayed(&self) -> bool {
        self.delay_minutes > 0
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.route_number.is_empty() {
            write!(f, "{} ", self.route_number)?;
        }
        write!(f, "{} → {}", self.actual_time, self.destination)?;
        if self.is_delayed() {
            write!(f, " (+{}min)", self.delay_minutes)?;
        }
        write!(f, " in {}min", self.minutes_to_arrival)
    }
}
