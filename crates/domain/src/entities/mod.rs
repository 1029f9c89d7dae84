//! Domain entities

mod departure;
mod snapshot;
mod stop_event;
mod trip;

pub use departure::Departure;
pub use snapshot::{AggregateSnapshot, TripResults};
pub use stop_event::StopEvent;
pub use trip::{TripConfig, TripResult};
