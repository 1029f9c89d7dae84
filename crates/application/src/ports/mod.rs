//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod departure_monitor_port;
mod result_sink_port;

#[cfg(test)]
pub use departure_monitor_port::MockDepartureMonitorPort;
pub use departure_monitor_port::{DepartureMonitorPort, DepartureQuery};
#[cfg(test)]
pub use result_sink_port::MockResultSinkPort;
pub use result_sink_port::ResultSinkPort;
