//! Value Objects - Immutable, identity-less domain primitives

mod trip_key;
mod trip_kind;

pub use trip_key::TripKey;
pub use trip_kind::TripKind;
