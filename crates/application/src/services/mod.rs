//! Application services - Use case implementations

pub mod event_normalizer;
pub mod keyword_filter;
pub mod poll_service;
pub mod result_publisher;
pub mod trip_aggregator;

pub use event_normalizer::normalize;
pub use keyword_filter::KeywordFilter;
pub use poll_service::{PollService, TickState};
pub use result_publisher::{PollOutcome, ResultPublisher, TRANSPORT_DATA, TRANSPORT_ERROR};
pub use trip_aggregator::{TripAggregator, select_departures};
