//! Transit time provider
//!
//! All query timestamps and countdowns are computed in the transit
//! authority's timezone, never in the host's. [`Clock`] is the seam that
//! lets normalization and query building run against a fixed instant in
//! tests.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::errors::DomainError;

/// Timezone of Transport for NSW
pub const TRANSIT_TIMEZONE: Tz = chrono_tz::Australia::Sydney;

/// Source of the current instant in a fixed timezone
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant in the clock's timezone
    fn now(&self) -> DateTime<Tz>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Create a system clock reporting in `tz`
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// System clock in Australia/Sydney
    #[must_use]
    pub const fn sydney() -> Self {
        Self::new(TRANSIT_TIMEZONE)
    }

    /// Timezone this clock reports in
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::sydney()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Tz>,
}

impl FixedClock {
    /// Create a clock that always returns `instant`
    #[must_use]
    pub const fn new(instant: DateTime<Tz>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.instant
    }
}

/// Parse an IANA timezone name
///
/// # Errors
///
/// Returns [`DomainError::InvalidTimezone`] for names chrono-tz does not know.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// `YYYYMMDD`, as the departure monitor's `itdDate` expects
#[must_use]
pub fn format_itd_date(at: &DateTime<Tz>) -> String {
    at.format("%Y%m%d").to_string()
}

/// `HHmm`, as the departure monitor's `itdTime` expects
#[must_use]
pub fn format_itd_time(at: &DateTime<Tz>) -> String {
    at.format("%H%M").to_string()
}

/// `HH:mm` wall-clock time
#[must_use]
pub fn format_clock_time(at: &DateTime<Tz>) -> String {
    at.format("%H:%M").to_string()
}

/// `HH:mm:ss` wall-clock time
#[must_use]
pub fn format_timestamp(at: &DateTime<Tz>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Round a duration to whole minutes, halves away from zero
#[must_use]
pub const fn round_to_minutes(delta: TimeDelta) -> i64 {
    let secs = delta.num_seconds();
    if secs >= 0 {
        (secs + 30) / 60
    } else {
        -((-secs + 30) / 60)
    }
}
