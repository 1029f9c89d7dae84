//! Domain layer for the NSW departure monitor
//!
//! Contains the departure model, trip configuration, the transit time
//! provider, and domain errors. This layer performs no I/O besides reading
//! the system clock.

pub mod entities;
pub mod errors;
pub mod time;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use time::{Clock, FixedClock, SystemClock, TRANSIT_TIMEZONE};
pub use value_objects::*;
