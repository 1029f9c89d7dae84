//! Periodic departure polling
//!
//! Ticks run one after another: the next tick waits for the previous one to
//! finish, and ticks missed meanwhile are skipped rather than bunched up. The
//! first tick fires immediately.

use std::sync::Arc;
use std::time::Duration;

use application::{PollRequest, PollService};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Shortest accepted poll period
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn a background task that runs a poll tick every `poll_interval`
///
/// The task stops once `shutdown` carries `true` or its sender is dropped.
/// A tick in progress is allowed to finish first.
pub fn spawn_departure_polling_task(
    service: Arc<PollService>,
    request: Arc<PollRequest>,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
    info!(
        interval_secs = poll_interval.as_secs(),
        trips = request.trips.len(),
        "Starting departure polling task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = service.tick(&request).await;
                    debug!(notification = outcome.notification(), "Poll tick finished");
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(ticks = service.ticks(), "Departure polling stopped");
                        break;
                    }
                },
            }
        }
    })
}
