//! Per-trip fetch, filter, normalize and truncate
//!
//! The aggregator runs one poll tick's worth of work: every configured trip
//! is fetched concurrently, each outcome is kept as its own `Result`, and
//! the successes are folded into an ordered snapshot. A failing trip is
//! logged and left out; it never takes the other trips down with it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::DateTime;
use chrono_tz::Tz;
use domain::entities::{AggregateSnapshot, Departure, StopEvent, TripResult, TripResults};
use domain::time::{Clock, format_timestamp};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::poll_request::{PlannedTrip, PollRequest};
use crate::ports::{DepartureMonitorPort, DepartureQuery};
use crate::services::event_normalizer::normalize;
use crate::services::keyword_filter::KeywordFilter;
use crate::services::poll_service::TickState;

/// Collects departures for all trips of a poll request
#[derive(Clone)]
pub struct TripAggregator {
    monitor: Arc<dyn DepartureMonitorPort>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TripAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripAggregator")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TripAggregator {
    /// Create an aggregator fetching through `monitor`
    pub fn new(monitor: Arc<dyn DepartureMonitorPort>, clock: Arc<dyn Clock>) -> Self {
        Self { monitor, clock }
    }

    /// Run one aggregation
    ///
    /// Trips that fail or end up with no departures are absent from the
    /// snapshot. `last_updated` is the clock's time when the last fetch
    /// finished.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::Aggregation`] when the request is invalid. No
    /// trip is fetched in that case.
    pub async fn collect(&self, request: &PollRequest) -> Result<AggregateSnapshot, ApplicationError> {
        self.collect_observed(request, &|_| {}).await
    }

    /// Run one aggregation, reporting progress to `progress`
    ///
    /// Once the request is valid, `progress` receives
    /// `Fetching { outstanding }` with every trip in flight. It receives it
    /// again with a smaller count each time a fetch settles, then
    /// `Aggregating` before the results are folded. An invalid request
    /// reports nothing.
    ///
    /// # Errors
    ///
    /// Same as [`TripAggregator::collect`].
    #[instrument(skip_all, fields(trips = request.trips.len()))]
    pub async fn collect_observed(
        &self,
        request: &PollRequest,
        progress: &(dyn Fn(TickState) + Send + Sync),
    ) -> Result<AggregateSnapshot, ApplicationError> {
        let planned = request.plan()?;
        let filter = KeywordFilter::new(&request.exclude_keywords)
            .map_err(|e| ApplicationError::Aggregation(e.to_string()))?;
        let now = self.clock.now();

        let outstanding = AtomicUsize::new(planned.len());
        progress(TickState::Fetching {
            outstanding: planned.len(),
        });

        let filter = &filter;
        let outstanding = &outstanding;
        let outcomes = join_all(planned.iter().map(|plan| async move {
            let outcome = self.collect_trip(plan, request, filter, now).await;
            let left = outstanding.fetch_sub(1, Ordering::AcqRel).saturating_sub(1);
            progress(TickState::Fetching { outstanding: left });
            outcome
        }))
        .await;

        progress(TickState::Aggregating);

        let mut results = TripResults::new();
        for (plan, outcome) in planned.into_iter().zip(outcomes) {
            match outcome {
                Ok(Some(result)) => {
                    results.insert(plan.key, result);
                },
                Ok(None) => {
                    debug!(trip_key = %plan.key, "No departures left, trip omitted");
                },
                Err(e) => {
                    warn!(
                        trip_key = %plan.key,
                        kind = %plan.trip.kind,
                        identifier = plan.identifier,
                        retryable = e.is_retryable(),
                        error = %e,
                        "Failed to fetch departures, trip omitted"
                    );
                },
            }
        }

        info!(
            trips = results.len(),
            departures = results.departure_count(),
            "Aggregated departures"
        );

        Ok(AggregateSnapshot::new(
            results,
            format_timestamp(&self.clock.now()),
        ))
    }

    async fn collect_trip(
        &self,
        plan: &PlannedTrip<'_>,
        request: &PollRequest,
        filter: &KeywordFilter,
        now: DateTime<Tz>,
    ) -> Result<Option<TripResult>, ApplicationError> {
        let query = DepartureQuery::new(
            plan.trip.kind,
            plan.identifier,
            request.api_key.clone(),
            now,
        );

        if request.debug {
            info!(
                trip_key = %plan.key,
                itd_date = %query.itd_date(),
                itd_time = %query.itd_time(),
                "Querying departure monitor"
            );
        }

        let events = self.monitor.fetch_stop_events(&query).await?;
        let departures = select_departures(&events, filter, &now, request.cap_for(plan.trip));

        debug!(
            trip_key = %plan.key,
            events = events.len(),
            kept = departures.len(),
            "Processed stop events"
        );

        if departures.is_empty() {
            return Ok(None);
        }

        Ok(Some(TripResult::new(plan.trip, plan.identifier, departures)))
    }
}

/// Filter, normalize and truncate one trip's stop events
///
/// Excluded and malformed events are dropped before the cap is applied, so
/// they never take a slot. API order is kept.
pub fn select_departures(
    events: &[StopEvent],
    filter: &KeywordFilter,
    now: &DateTime<Tz>,
    cap: usize,
) -> Vec<Departure> {
    events
        .iter()
        .filter(|event| !filter.is_excluded(event.route_description_or_empty()))
        .filter_map(|event| match normalize(event, now) {
            Ok(departure) => Some(departure),
            Err(e) => {
                debug!(error = %e, "Skipping malformed stop event");
                None
            },
        })
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use domain::entities::TripConfig;
    use domain::time::FixedClock;
    use domain::value_objects::TripKind;
    use domain::TRANSIT_TIMEZONE;
    use mockall::predicate::function;
    use proptest::prelude::*;
    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::ports::MockDepartureMonitorPort;

    fn now() -> DateTime<Tz> {
        TRANSIT_TIMEZONE
            .with_ymd_and_hms(2026, 3, 3, 8, 10, 0)
            .single()
            .unwrap()
    }

    fn aggregator(mock: MockDepartureMonitorPort) -> TripAggregator {
        TripAggregator::new(Arc::new(mock), Arc::new(FixedClock::new(now())))
    }

    fn request(trips: Vec<TripConfig>) -> PollRequest {
        PollRequest::new(SecretString::from("test-key"), trips)
    }

    fn event(planned: &str, description: &str) -> StopEvent {
        StopEvent::planned(planned)
            .with_destination("Hornsby")
            .with_route(description, description)
    }

    #[tokio::test]
    async fn end_to_end_exclusion_delay_and_cap() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events()
            .with(function(|q: &DepartureQuery| {
                q.kind == TripKind::Train
                    && q.identifier == "2000274"
                    && q.itd_date() == "20260303"
                    && q.itd_time() == "0810"
                    && q.api_key.expose_secret() == "test-key"
            }))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    event("2026-03-02T21:12:00Z", "Special Event Service"),
                    event("2026-03-02T21:15:00Z", "T1").with_estimate("2026-03-02T21:20:00Z"),
                    event("2026-03-02T21:25:00Z", "T1"),
                ])
            });

        let trip = TripConfig::train("2000274").with_max_departures(2);
        let snapshot = aggregator(mock)
            .collect(&request(vec![trip]).with_exclude_keywords(["Special"]))
            .await
            .unwrap();

        let result = snapshot.departures.get("2000274").unwrap();
        assert_eq!(result.kind, TripKind::Train);
        assert_eq!(result.identifier, "2000274");
        assert_eq!(result.departures.len(), 2);
        assert_eq!(result.departures[0].scheduled_time, "08:15");
        assert_eq!(result.departures[0].delay_minutes, 5);
        assert_eq!(result.departures[1].scheduled_time, "08:25");
        assert_eq!(result.departures[1].delay_minutes, 0);
        assert_eq!(snapshot.last_updated, "08:10:00");
    }

    #[tokio::test]
    async fn failing_trip_is_isolated() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events()
            .returning(|q| match q.identifier.as_str() {
                "two" => Err(ApplicationError::Network("connection refused".into())),
                _ => Ok(vec![event("2026-03-02T21:15:00Z", "T1")]),
            });

        let snapshot = aggregator(mock)
            .collect(&request(vec![
                TripConfig::train("one"),
                TripConfig::train("two"),
                TripConfig::bus("three"),
            ]))
            .await
            .unwrap();

        let keys: Vec<&str> = snapshot.departures.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["one", "three"]);
    }

    #[tokio::test]
    async fn api_error_is_isolated_too() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events()
            .returning(|q| match q.identifier.as_str() {
                "one" => Err(ApplicationError::Api("Request failed: HTTP 500".into())),
                _ => Ok(vec![event("2026-03-02T21:15:00Z", "431")]),
            });

        let snapshot = aggregator(mock)
            .collect(&request(vec![TripConfig::train("one"), TripConfig::bus("200060")]))
            .await
            .unwrap();

        assert!(!snapshot.departures.contains_key("one"));
        assert!(snapshot.departures.contains_key("200060"));
    }

    #[tokio::test]
    async fn insertion_order_is_configured_order() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events()
            .returning(|_| Ok(vec![event("2026-03-02T21:15:00Z", "T1")]));

        let snapshot = aggregator(mock)
            .collect(&request(vec![
                TripConfig::bus("c"),
                TripConfig::train("a"),
                TripConfig::bus("b").with_id("z"),
            ]))
            .await
            .unwrap();

        let keys: Vec<&str> = snapshot.departures.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["c", "a", "z"]);
    }

    #[tokio::test]
    async fn empty_trip_is_omitted() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events()
            .returning(|_| Ok(vec![event("2026-03-02T21:15:00Z", "Special")]));

        let snapshot = aggregator(mock)
            .collect(&request(vec![TripConfig::train("2000274")]).with_exclude_keywords(["special"]))
            .await
            .unwrap();

        assert!(snapshot.departures.is_empty());
    }

    #[tokio::test]
    async fn malformed_event_is_skipped_not_the_trip() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events().returning(|_| {
            Ok(vec![
                StopEvent::default().with_destination("Nowhere"),
                event("2026-03-02T21:15:00Z", "T1"),
            ])
        });

        let snapshot = aggregator(mock)
            .collect(&request(vec![TripConfig::train("2000274")]))
            .await
            .unwrap();

        let result = snapshot.departures.get("2000274").unwrap();
        assert_eq!(result.departures.len(), 1);
        assert_eq!(result.departures[0].destination, "Hornsby");
    }

    #[tokio::test]
    async fn invalid_request_fetches_nothing() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events().times(0);

        let err = aggregator(mock)
            .collect(&request(vec![TripConfig::train("1"), TripConfig::train("1")]))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Aggregation(_)));
    }

    #[tokio::test]
    async fn trip_metadata_is_carried_over() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events()
            .with(function(|q: &DepartureQuery| q.kind == TripKind::Bus))
            .returning(|_| Ok(vec![event("2026-03-02T21:15:00Z", "431")]));

        let trip = TripConfig::bus("200060")
            .with_id("home")
            .with_stop_name("Railway Square")
            .with_route_id("431");
        let snapshot = aggregator(mock).collect(&request(vec![trip])).await.unwrap();

        let result = snapshot.departures.get("home").unwrap();
        assert_eq!(result.identifier, "200060");
        assert_eq!(result.stop_name, "Railway Square");
        assert_eq!(result.route_id.as_deref(), Some("431"));
    }

    #[tokio::test]
    async fn default_cap_applies() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events().returning(|_| {
            Ok((0..10)
                .map(|i| event(&format!("2026-03-02T21:{:02}:00Z", 15 + i), "T1"))
                .collect())
        });

        let snapshot = aggregator(mock)
            .collect(&request(vec![TripConfig::train("1")]).with_default_max_departures(3))
            .await
            .unwrap();

        assert_eq!(snapshot.departures.get("1").unwrap().departures.len(), 3);
    }

    #[tokio::test]
    async fn progress_counts_down_then_aggregates() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events()
            .returning(|q| match q.identifier.as_str() {
                "two" => Err(ApplicationError::Network("timeout".into())),
                _ => Ok(vec![event("2026-03-02T21:15:00Z", "T1")]),
            });

        let seen = Mutex::new(Vec::new());
        let record = |state: TickState| seen.lock().unwrap().push(state);
        aggregator(mock)
            .collect_observed(
                &request(vec![TripConfig::train("one"), TripConfig::train("two")]),
                &record,
            )
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            [
                TickState::Fetching { outstanding: 2 },
                TickState::Fetching { outstanding: 1 },
                TickState::Fetching { outstanding: 0 },
                TickState::Aggregating,
            ]
        );
    }

    #[tokio::test]
    async fn invalid_request_reports_no_progress() {
        let mut mock = MockDepartureMonitorPort::new();
        mock.expect_fetch_stop_events().times(0);

        let seen = Mutex::new(Vec::new());
        let record = |state: TickState| seen.lock().unwrap().push(state);
        let result = aggregator(mock)
            .collect_observed(&request(vec![TripConfig::bus("1"), TripConfig::bus("1")]), &record)
            .await;

        assert!(result.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn truncation_keeps_order_and_cap(count in 0usize..20, cap in 1usize..8) {
            let events: Vec<StopEvent> = (0..count)
                .map(|i| event(&format!("2026-03-02T21:{:02}:00Z", 15 + i), "T1"))
                .collect();

            let selected = select_departures(&events, &KeywordFilter::none(), &now(), cap);

            prop_assert_eq!(selected.len(), count.min(cap));
            for (i, departure) in selected.iter().enumerate() {
                prop_assert_eq!(departure.scheduled_time.clone(), format!("08:{:02}", 15 + i));
            }
        }
    }
}
