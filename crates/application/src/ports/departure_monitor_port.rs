//! Departure monitor port
//!
//! Defines how the aggregator obtains stop events for one trip. The
//! infrastructure layer implements it on top of the TfNSW HTTP client.

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use domain::entities::StopEvent;
use domain::time::{format_itd_date, format_itd_time};
use domain::value_objects::TripKind;
#[cfg(test)]
use mockall::automock;
use secrecy::SecretString;

use crate::error::ApplicationError;

/// One departure monitor lookup
#[derive(Debug, Clone)]
pub struct DepartureQuery {
    /// Train (platform lookup) or bus (stop lookup)
    pub kind: TripKind,
    /// Station for trains, stop id for buses
    pub identifier: String,
    /// Credential sent with the request
    pub api_key: SecretString,
    /// Local instant the departures are requested for
    pub requested_at: DateTime<Tz>,
}

impl DepartureQuery {
    /// Create a query for `identifier` at `requested_at`
    #[must_use]
    pub fn new(
        kind: TripKind,
        identifier: impl Into<String>,
        api_key: SecretString,
        requested_at: DateTime<Tz>,
    ) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            api_key,
            requested_at,
        }
    }

    /// `itdDate` value, `YYYYMMDD`
    #[must_use]
    pub fn itd_date(&self) -> String {
        format_itd_date(&self.requested_at)
    }

    /// `itdTime` value, `HHmm`
    #[must_use]
    pub fn itd_time(&self) -> String {
        format_itd_time(&self.requested_at)
    }
}

/// Port for fetching stop events
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DepartureMonitorPort: Send + Sync {
    /// Fetch the stop events for one station or stop, in API order
    ///
    /// Fails with [`ApplicationError::Network`] or [`ApplicationError::Api`].
    /// Records that cannot be decoded are dropped by the adapter, not
    /// reported as errors.
    async fn fetch_stop_events(
        &self,
        query: &DepartureQuery,
    ) -> Result<Vec<StopEvent>, ApplicationError>;
}
