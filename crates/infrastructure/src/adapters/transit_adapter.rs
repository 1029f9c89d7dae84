//! Departure monitor adapter - Implements DepartureMonitorPort using integration_transit

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{DepartureMonitorPort, DepartureQuery};
use async_trait::async_trait;
use domain::entities::StopEvent;
use domain::value_objects::TripKind;
use integration_transit::{
    DepartureMode, DepartureMonitorResponse, RawStopEvent, TfnswTransitClient, TransitClient,
    TransitError,
};
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

/// Adapter for the TfNSW departure monitor
pub struct TfnswDepartureAdapter {
    client: Arc<dyn TransitClient>,
}

impl std::fmt::Debug for TfnswDepartureAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfnswDepartureAdapter")
            .field("client", &"TransitClient")
            .finish()
    }
}

impl TfnswDepartureAdapter {
    /// Create an adapter around the TfNSW HTTP client
    #[must_use]
    pub fn new(client: TfnswTransitClient) -> Self {
        Self::with_client(Arc::new(client))
    }

    /// Create an adapter around any departure monitor client
    #[must_use]
    pub fn with_client(client: Arc<dyn TransitClient>) -> Self {
        Self { client }
    }

    /// Lookup mode for a trip kind
    const fn mode_for(kind: TripKind) -> DepartureMode {
        match kind {
            TripKind::Train => DepartureMode::Train,
            TripKind::Bus => DepartureMode::Bus,
        }
    }

    /// Convert a decoded API record into a domain stop event
    fn convert_event(raw: RawStopEvent) -> StopEvent {
        StopEvent {
            destination_name: raw.destination_name().map(ToString::to_string),
            route_number: raw.route_number().map(ToString::to_string),
            route_description: raw.disassembled_name().map(ToString::to_string),
            departure_time_planned: raw.departure_time_planned,
            departure_time_estimated: raw.departure_time_estimated,
        }
    }
}

/// Map client errors onto the application taxonomy
///
/// Connection failures and timeouts are network errors; everything the
/// server answered with (error statuses, rate limiting, bad bodies) is an
/// API error.
pub fn map_transit_error(error: &TransitError) -> ApplicationError {
    if error.is_network() {
        ApplicationError::Network(error.to_string())
    } else if matches!(error, TransitError::ConfigurationError(_)) {
        ApplicationError::Configuration(error.to_string())
    } else {
        ApplicationError::Api(error.to_string())
    }
}

#[async_trait]
impl DepartureMonitorPort for TfnswDepartureAdapter {
    #[instrument(skip(self, query), fields(kind = %query.kind, identifier = %query.identifier))]
    async fn fetch_stop_events(
        &self,
        query: &DepartureQuery,
    ) -> Result<Vec<StopEvent>, ApplicationError> {
        let body = self
            .client
            .fetch_departure_monitor(
                Self::mode_for(query.kind),
                &query.identifier,
                query.api_key.expose_secret(),
                &query.itd_date(),
                &query.itd_time(),
            )
            .await
            .map_err(|e| map_transit_error(&e))?;

        let response = DepartureMonitorResponse::from_value(&body).map_err(|e| map_transit_error(&e))?;

        if response.skipped > 0 {
            warn!(skipped = response.skipped, "Dropped undecodable stop events");
        }
        debug!(count = response.stop_events.len(), "Received stop events");

        Ok(response
            .stop_events
            .into_iter()
            .map(Self::convert_event)
            .collect())
    }
}
