//! Result sink port
//!
//! Receives the outcome of every poll tick. Adapters decide where it goes
//! (stdout, a snapshot file, ...).

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;
use crate::services::PollOutcome;

/// Port for publishing poll outcomes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResultSinkPort: Send + Sync {
    /// Deliver one outcome
    async fn publish(&self, outcome: &PollOutcome) -> Result<(), ApplicationError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
