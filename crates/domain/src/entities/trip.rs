//! Monitored trips and their per-tick results

use serde::{Deserialize, Serialize};

use crate::entities::Departure;
use crate::errors::DomainError;
use crate::value_objects::{TripKey, TripKind};

/// One monitored station or stop, as supplied by configuration
///
/// Trains are looked up by `station`, buses by `stop_id`. The publishing key
/// is `id` when given, otherwise the lookup identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripConfig {
    /// Explicit publishing key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Transport mode
    #[serde(rename = "type")]
    pub kind: TripKind,

    /// Station or platform identifier (trains)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,

    /// Stop identifier (buses)
    #[serde(default, alias = "stopId", skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<String>,

    /// Display name of the station or stop
    #[serde(
        default,
        alias = "stopName",
        alias = "display_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_name: Option<String>,

    /// Route the trip is associated with, passed through for display
    #[serde(default, alias = "routeId", skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    /// Per-trip departure cap
    #[serde(
        default,
        alias = "maxDepartures",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_departures: Option<usize>,
}

impl TripConfig {
    /// A train trip monitoring `station`
    #[must_use]
    pub fn train(station: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: TripKind::Train,
            station: Some(station.into()),
            stop_id: None,
            stop_name: None,
            route_id: None,
            max_departures: None,
        }
    }

    /// A bus trip monitoring `stop_id`
    #[must_use]
    pub fn bus(stop_id: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: TripKind::Bus,
            station: None,
            stop_id: Some(stop_id.into()),
            stop_name: None,
            route_id: None,
            max_departures: None,
        }
    }

    /// Set the publishing key
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the display name
    #[must_use]
    pub fn with_stop_name(mut self, name: impl Into<String>) -> Self {
        self.stop_name = Some(name.into());
        self
    }

    /// Set the route id
    #[must_use]
    pub fn with_route_id(mut self, route_id: impl Into<String>) -> Self {
        self.route_id = Some(route_id.into());
        self
    }

    /// Set the departure cap
    #[must_use]
    pub const fn with_max_departures(mut self, max: usize) -> Self {
        self.max_departures = Some(max);
        self
    }

    /// Identifier the departure monitor is queried with
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTripConfig`] when the field required by
    /// the trip's mode is missing or blank.
    pub fn identifier(&self) -> Result<&str, DomainError> {
        let (value, field) = match self.kind {
            TripKind::Train => (self.station.as_deref(), "station"),
            TripKind::Bus => (self.stop_id.as_deref(), "stop_id"),
        };

        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                DomainError::invalid_trip(
                    self.describe(),
                    format!("{} trips need a non-empty {field}", self.kind),
                )
            })
    }

    /// Key the trip's result is published under
    ///
    /// # Errors
    ///
    /// Fails when there is no explicit id and no usable identifier.
    pub fn key(&self) -> Result<TripKey, DomainError> {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(TripKey::new(id)),
            _ => self.identifier().map(TripKey::new),
        }
    }

    /// Name shown for the trip
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.stop_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.identifier().ok())
            .unwrap_or_default()
    }

    /// Departure cap, falling back to `default` when unset or zero
    #[must_use]
    pub fn max_departures_or(&self, default: usize) -> usize {
        self.max_departures.filter(|&n| n > 0).unwrap_or(default)
    }

    fn describe(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.stop_name.clone())
            .unwrap_or_else(|| format!("unnamed {} trip", self.kind))
    }
}

/// Departures collected for one trip during a poll tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResult {
    /// Transport mode
    #[serde(rename = "type")]
    pub kind: TripKind,
    /// Station or stop identifier the departures were fetched for
    #[serde(rename = "station")]
    pub identifier: String,
    /// Display name
    pub stop_name: String,
    /// Configured route id, if any
    pub route_id: Option<String>,
    /// Upcoming departures in the API's order, truncated
    pub departures: Vec<Departure>,
}

impl TripResult {
    /// Build the result for `trip` from its normalized departures
    #[must_use]
    pub fn new(trip: &TripConfig, identifier: impl Into<String>, departures: Vec<Departure>) -> Self {
        Self {
            kind: trip.kind,
            identifier: identifier.into(),
            stop_name: trip.display_name().to_string(),
            route_id: trip.route_id.clone(),
            departures,
        }
    }
}
