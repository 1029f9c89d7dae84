//! Poll outcomes and their delivery
//!
//! Every tick ends in exactly one [`PollOutcome`]: the snapshot or the
//! error message. The publisher fans it out to all registered sinks.

use std::fmt;
use std::sync::Arc;

use domain::entities::AggregateSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApplicationError;
use crate::ports::ResultSinkPort;

/// Notification name of a successful tick
pub const TRANSPORT_DATA: &str = "TRANSPORT_DATA";
/// Notification name of a failed tick
pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";

/// Result of one poll tick
///
/// Serializes as `{"notification": "...", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notification", content = "payload")]
pub enum PollOutcome {
    /// Aggregated departures
    #[serde(rename = "TRANSPORT_DATA")]
    Data(AggregateSnapshot),
    /// Message of the error that aborted the tick
    #[serde(rename = "TRANSPORT_ERROR")]
    Error(String),
}

impl PollOutcome {
    /// Turn an aggregation result into an outcome
    #[must_use]
    pub fn from_result(result: Result<AggregateSnapshot, ApplicationError>) -> Self {
        match result {
            Ok(snapshot) => Self::Data(snapshot),
            Err(e) => Self::Error(e.to_string()),
        }
    }

    /// Notification name
    #[must_use]
    pub const fn notification(&self) -> &'static str {
        match self {
            Self::Data(_) => TRANSPORT_DATA,
            Self::Error(_) => TRANSPORT_ERROR,
        }
    }

    /// Whether the tick produced data
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// The snapshot, if any
    #[must_use]
    pub const fn snapshot(&self) -> Option<&AggregateSnapshot> {
        match self {
            Self::Data(snapshot) => Some(snapshot),
            Self::Error(_) => None,
        }
    }
}

/// Delivers outcomes to every registered sink
#[derive(Clone, Default)]
pub struct ResultPublisher {
    sinks: Vec<Arc<dyn ResultSinkPort>>,
}

impl fmt::Debug for ResultPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultPublisher")
            .field(
                "sinks",
                &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResultPublisher {
    /// Create a publisher without sinks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ResultSinkPort>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of registered sinks
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver `outcome` to all sinks
    ///
    /// A failing sink is logged and skipped. Returns how many sinks accepted
    /// the outcome.
    pub async fn publish(&self, outcome: &PollOutcome) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.publish(outcome).await {
                Ok(()) => {
                    delivered += 1;
                    debug!(sink = sink.name(), notification = outcome.notification(), "Outcome published");
                },
                Err(e) => {
                    warn!(sink = sink.name(), error = %e, "Failed to publish outcome");
                },
            }
        }
        delivered
    }
}
