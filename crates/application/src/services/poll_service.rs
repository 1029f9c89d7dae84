//! Poll tick orchestration
//!
//! One tick walks `Idle → Fetching → Aggregating → Published | Errored`.
//! `Fetching` counts down as trip fetches settle. A request rejected before
//! any fetch goes from `Idle` straight to `Errored`. The service keeps no
//! data between ticks; only the current state is observable through a
//! watch channel.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{error, info, instrument};

use crate::poll_request::PollRequest;
use crate::services::result_publisher::{PollOutcome, ResultPublisher};
use crate::services::trip_aggregator::TripAggregator;

/// Where the current or last tick is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickState {
    /// Waiting for the next tick
    Idle,
    /// Trip fetches in flight
    Fetching {
        /// Trip fetches not yet settled
        outstanding: usize,
    },
    /// Folding trip results into the snapshot
    Aggregating,
    /// The tick produced a snapshot
    Published,
    /// The tick failed as a whole
    Errored,
}

impl TickState {
    /// Whether the tick has finished
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Published | Self::Errored)
    }
}

impl fmt::Display for TickState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Fetching { outstanding } => write!(f, "fetching ({outstanding} trips)"),
            Self::Aggregating => write!(f, "aggregating"),
            Self::Published => write!(f, "published"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// Runs poll ticks
#[derive(Debug)]
pub struct PollService {
    aggregator: TripAggregator,
    publisher: ResultPublisher,
    state: watch::Sender<TickState>,
    ticks: AtomicU64,
}

impl PollService {
    /// Create a poll service
    #[must_use]
    pub fn new(aggregator: TripAggregator, publisher: ResultPublisher) -> Self {
        let (state, _) = watch::channel(TickState::Idle);
        Self {
            aggregator,
            publisher,
            state,
            ticks: AtomicU64::new(0),
        }
    }

    /// Current tick state
    #[must_use]
    pub fn state(&self) -> TickState {
        *self.state.borrow()
    }

    /// Observe state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TickState> {
        self.state.subscribe()
    }

    /// Number of ticks started so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Run one tick and publish its outcome
    ///
    /// Never fails: a tick-level error becomes [`PollOutcome::Error`].
    #[instrument(skip_all, fields(tick = tracing::field::Empty))]
    pub async fn tick(&self, request: &PollRequest) -> PollOutcome {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::Span::current().record("tick", tick);

        self.transition(TickState::Idle);
        if request.debug {
            info!(?request, "Poll request");
        }

        let result = self
            .aggregator
            .collect_observed(request, &|state| self.transition(state))
            .await;

        let outcome = match result {
            Ok(snapshot) => PollOutcome::Data(snapshot),
            Err(e) => {
                error!(error = %e, "Poll tick failed");
                PollOutcome::Error(e.to_string())
            },
        };

        self.publisher.publish(&outcome).await;

        self.transition(if outcome.is_data() {
            TickState::Published
        } else {
            TickState::Errored
        });

        outcome
    }

    fn transition(&self, next: TickState) {
        let previous = self.state.send_replace(next);
        tracing::trace!(from = %previous, to = %next, "Tick state");
    }
}
