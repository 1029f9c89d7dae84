//! Stop event normalization
//!
//! Turns one raw stop event into a [`Departure`]: local `HH:mm` times, the
//! delay against the timetable and the countdown from `now`.

use chrono::DateTime;
use chrono_tz::Tz;
use domain::entities::{Departure, StopEvent};
use domain::errors::DomainError;
use domain::time::{format_clock_time, round_to_minutes};

/// Normalize a stop event relative to `now`
///
/// Times are rendered in `now`'s timezone. Early running never shows up as
/// delay. The result only depends on the arguments.
///
/// # Errors
///
/// [`DomainError::MalformedEvent`] when the planned departure is missing or
/// either timestamp cannot be parsed. Callers drop the event and carry on.
pub fn normalize(event: &StopEvent, now: &DateTime<Tz>) -> Result<Departure, DomainError> {
    let tz = now.timezone();
    let scheduled = event.planned_departure()?.with_timezone(&tz);
    let actual = event
        .estimated_departure()?
        .map_or(scheduled, |estimate| estimate.with_timezone(&tz));

    let delay = round_to_minutes(actual - scheduled).max(0);
    let minutes_to_arrival = round_to_minutes(actual - *now);

    let destination = event
        .destination_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(Departure::UNKNOWN_DESTINATION)
        .to_string();
    let route_number = event.route_number.clone().unwrap_or_default();

    Ok(Departure {
        destination,
        scheduled_time: format_clock_time(&scheduled),
        actual_time: format_clock_time(&actual),
        delay_minutes: u32::try_from(delay).unwrap_or(u32::MAX),
        minutes_to_arrival,
        route_id: route_number.clone(),
        route_number,
    })
}
