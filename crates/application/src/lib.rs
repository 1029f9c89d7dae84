//! Application layer - Use cases and orchestration
//!
//! Contains the departure pipeline (normalize, filter, aggregate, publish)
//! and the ports it drives. Adapters in the infrastructure layer supply the
//! transit API and the result sinks.

pub mod error;
pub mod poll_request;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use poll_request::{DEFAULT_MAX_DEPARTURES, PlannedTrip, PollRequest};
pub use ports::*;
pub use services::*;
