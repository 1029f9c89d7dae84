//! Transport for NSW departure monitor integration
//!
//! Queries the [TfNSW Open Data](https://opendata.transport.nsw.gov.au) trip
//! planner `departure_mon` endpoint for a station or stop and returns the raw
//! JSON payload, optionally keeping a copy on disk for diagnostics.
//!
//! # Architecture
//!
//! [`TransitClient`] defines the interface; [`TfnswTransitClient`] implements
//! it over `reqwest`. [`DepartureMode`] selects the platform (train) or stop
//! (bus) lookup and the means-of-transport exclusions that go with it.
//! [`DepartureMonitorResponse`] decodes the payload into [`RawStopEvent`]s,
//! skipping individual records that do not decode.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_transit::{DepartureMode, TfnswTransitClient, TransitClient, TransitConfig};
//!
//! let client = TfnswTransitClient::new(&TransitConfig::default())?;
//! let body = client
//!     .fetch_departure_monitor(DepartureMode::Train, "2000274", "my-key", "20260302", "0815")
//!     .await?;
//! ```

mod client;
mod config;
mod dump;
mod error;
mod models;
mod query;

pub use client::{DEPARTURE_MONITOR_PATH, TfnswTransitClient, TransitClient};
pub use config::TransitConfig;
pub use dump::ResponseDump;
pub use error::TransitError;
pub use models::{DepartureMonitorResponse, RawDestination, RawStopEvent, RawTransportation};
pub use query::{DepartureMode, MeansOfTransport, departure_monitor_params};
