//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the TfNSW departure
//! monitor adapter and the result sinks. Also owns configuration, logging
//! setup and the polling task.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod poller;
pub mod sinks;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::{build_aggregator, build_poll_service, build_transit_client};
pub use config::{AppConfig, AppConfigError, LoggingConfig};
pub use poller::spawn_departure_polling_task;
pub use sinks::{JsonLinesSink, SnapshotFileSink};
pub use telemetry::{TelemetryError, init_logging};
