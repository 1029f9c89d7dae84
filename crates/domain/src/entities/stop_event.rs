//! Raw stop events as reported by the departure monitor

use chrono::{DateTime, FixedOffset};

use crate::errors::DomainError;

/// One departure record from the transit API, read-only
///
/// Every field is optional because the API omits what it does not know.
/// Timestamps stay as the API sent them; they are only interpreted during
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopEvent {
    /// `transportation.destination.name`
    pub destination_name: Option<String>,
    /// `transportation.number`
    pub route_number: Option<String>,
    /// `transportation.disassembledName`, matched by exclusion keywords
    pub route_description: Option<String>,
    /// `departureTimePlanned`, ISO-8601
    pub departure_time_planned: Option<String>,
    /// `departureTimeEstimated`, ISO-8601, only for real-time services
    pub departure_time_estimated: Option<String>,
}

impl StopEvent {
    /// Event planned to depart at `planned`
    #[must_use]
    pub fn planned(planned: impl Into<String>) -> Self {
        Self {
            departure_time_planned: Some(planned.into()),
            ..Self::default()
        }
    }

    /// Set the real-time estimate
    #[must_use]
    pub fn with_estimate(mut self, estimated: impl Into<String>) -> Self {
        self.departure_time_estimated = Some(estimated.into());
        self
    }

    /// Set the destination name
    #[must_use]
    pub fn with_destination(mut self, name: impl Into<String>) -> Self {
        self.destination_name = Some(name.into());
        self
    }

    /// Set route number and description
    #[must_use]
    pub fn with_route(mut self, number: impl Into<String>, description: impl Into<String>) -> Self {
        self.route_number = Some(number.into());
        self.route_description = Some(description.into());
        self
    }

    /// Route description used for keyword exclusion, empty when absent
    #[must_use]
    pub fn route_description_or_empty(&self) -> &str {
        self.route_description.as_deref().unwrap_or_default()
    }

    /// Parsed planned departure
    ///
    /// # Errors
    ///
    /// [`DomainError::MalformedEvent`] when the field is missing or not a
    /// valid timestamp.
    pub fn planned_departure(&self) -> Result<DateTime<FixedOffset>, DomainError> {
        let raw = self.departure_time_planned.as_deref().ok_or_else(|| {
            DomainError::MalformedEvent("missing departureTimePlanned".to_string())
        })?;
        parse_timestamp("departureTimePlanned", raw)
    }

    /// Parsed real-time estimate, `None` when the API supplied none
    ///
    /// A blank estimate counts as none.
    ///
    /// # Errors
    ///
    /// [`DomainError::MalformedEvent`] when present but unparseable.
    pub fn estimated_departure(&self) -> Result<Option<DateTime<FixedOffset>>, DomainError> {
        self.departure_time_estimated
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_timestamp("departureTimeEstimated", raw))
            .transpose()
    }
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<FixedOffset>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map_err(|e| DomainError::MalformedEvent(format!("{field} '{raw}': {e}")))
}
