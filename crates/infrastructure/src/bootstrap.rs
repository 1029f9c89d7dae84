//! Service wiring
//!
//! Builds the poll pipeline from configuration: HTTP client, optional
//! response dump, adapter, clock and aggregator.

use std::sync::Arc;

use application::{PollService, ResultPublisher, TripAggregator};
use domain::time::SystemClock;
use integration_transit::{ResponseDump, TfnswTransitClient};
use tracing::{info, warn};

use crate::adapters::TfnswDepartureAdapter;
use crate::config::{AppConfig, AppConfigError};

/// Build the HTTP client, with response dumps when debug mode is on
///
/// A dump directory that cannot be created only disables dumping.
pub fn build_transit_client(config: &AppConfig) -> Result<TfnswTransitClient, AppConfigError> {
    let client = TfnswTransitClient::new(&config.transit)
        .map_err(|e| AppConfigError::Invalid(vec![format!("transit: {e}")]))?;

    if !config.debug {
        return Ok(client);
    }

    match ResponseDump::create(&config.transit.response_dir) {
        Ok(dump) => {
            info!(dir = %dump.dir().display(), "Saving raw responses");
            Ok(client.with_response_dump(dump))
        },
        Err(e) => {
            warn!(error = %e, "Response dumps disabled");
            Ok(client)
        },
    }
}

/// Build the aggregator for `config`
pub fn build_aggregator(config: &AppConfig) -> Result<TripAggregator, AppConfigError> {
    let timezone = config
        .timezone()
        .map_err(|e| AppConfigError::Invalid(vec![e.to_string()]))?;
    let adapter = TfnswDepartureAdapter::new(build_transit_client(config)?);

    Ok(TripAggregator::new(
        Arc::new(adapter),
        Arc::new(SystemClock::new(timezone)),
    ))
}

/// Build the poll service publishing through `publisher`
pub fn build_poll_service(
    config: &AppConfig,
    publisher: ResultPublisher,
) -> Result<PollService, AppConfigError> {
    Ok(PollService::new(build_aggregator(config)?, publisher))
}
