//! Departure monitor response models
//!
//! Typed views of the `rapidJSON` departure monitor payload. Only the fields
//! the monitor consumes are modelled; everything else is ignored.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::TransitError;

/// Decoded departure monitor payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartureMonitorResponse {
    /// Stop events that decoded, in API order
    pub stop_events: Vec<RawStopEvent>,
    /// Records in `stopEvents` that did not decode
    pub skipped: usize,
}

impl DepartureMonitorResponse {
    /// Decode a raw payload
    ///
    /// A missing `stopEvents` key yields an empty list. Individual records
    /// that fail to decode are counted in `skipped` instead of failing the
    /// whole payload.
    ///
    /// # Errors
    ///
    /// [`TransitError::ParseError`] when the payload is not an object or
    /// `stopEvents` is not an array.
    pub fn from_value(body: &Value) -> Result<Self, TransitError> {
        let object = body.as_object().ok_or_else(|| {
            TransitError::ParseError("departure monitor response is not a JSON object".to_string())
        })?;

        let Some(events) = object.get("stopEvents") else {
            return Ok(Self::default());
        };

        let events = events
            .as_array()
            .ok_or_else(|| TransitError::ParseError("stopEvents is not an array".to_string()))?;

        let mut response = Self::default();
        for (index, event) in events.iter().enumerate() {
            match RawStopEvent::deserialize(event) {
                Ok(decoded) => response.stop_events.push(decoded),
                Err(e) => {
                    debug!(index, error = %e, "Skipping undecodable stop event");
                    response.skipped += 1;
                },
            }
        }

        Ok(response)
    }
}

/// One entry of `stopEvents`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStopEvent {
    /// Service information
    #[serde(default)]
    pub transportation: Option<RawTransportation>,
    /// Planned departure, ISO-8601 UTC
    #[serde(default)]
    pub departure_time_planned: Option<String>,
    /// Real-time estimate, ISO-8601 UTC
    #[serde(default)]
    pub departure_time_estimated: Option<String>,
    /// Whether the service reports real-time data
    #[serde(default)]
    pub is_realtime_controlled: Option<bool>,
}

impl RawStopEvent {
    /// `transportation.destination.name`
    #[must_use]
    pub fn destination_name(&self) -> Option<&str> {
        self.transportation
            .as_ref()
            .and_then(|t| t.destination.as_ref())
            .and_then(|d| d.name.as_deref())
    }

    /// `transportation.number`
    #[must_use]
    pub fn route_number(&self) -> Option<&str> {
        self.transportation
            .as_ref()
            .and_then(|t| t.number.as_deref())
    }

    /// `transportation.disassembledName`
    #[must_use]
    pub fn disassembled_name(&self) -> Option<&str> {
        self.transportation
            .as_ref()
            .and_then(|t| t.disassembled_name.as_deref())
    }
}

/// `transportation` block of a stop event
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransportation {
    /// Route id, e.g. `nsw:020T1: :H:sj2`
    #[serde(default)]
    pub id: Option<String>,
    /// Full service name
    #[serde(default)]
    pub name: Option<String>,
    /// Short route description, e.g. `T1`
    #[serde(default)]
    pub disassembled_name: Option<String>,
    /// Route number shown to passengers
    #[serde(default)]
    pub number: Option<String>,
    /// Where the service terminates
    #[serde(default)]
    pub destination: Option<RawDestination>,
}

/// `transportation.destination` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawDestination {
    /// Destination stop id
    #[serde(default)]
    pub id: Option<String>,
    /// Destination name
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_stop_events() {
        let body = json!({
            "version": "10.2.1.42",
            "stopEvents": [{
                "isRealtimeControlled": true,
                "departureTimePlanned": "2026-03-02T21:15:00Z",
                "departureTimeEstimated": "2026-03-02T21:20:00Z",
                "transportation": {
                    "id": "nsw:020T1: :H:sj2",
                    "name": "Sydney Trains Network T1 North Shore & Western Line",
                    "disassembledName": "T1",
                    "number": "T1 North Shore & Western Line",
                    "destination": { "id": "10101100", "name": "Hornsby" }
                }
            }]
        });

        let response = DepartureMonitorResponse::from_value(&body).unwrap();
        assert_eq!(response.skipped, 0);
        assert_eq!(response.stop_events.len(), 1);

        let event = &response.stop_events[0];
        assert_eq!(event.destination_name(), Some("Hornsby"));
        assert_eq!(event.route_number(), Some("T1 North Shore & Western Line"));
        assert_eq!(event.disassembled_name(), Some("T1"));
        assert_eq!(
            event.departure_time_estimated.as_deref(),
            Some("2026-03-02T21:20:00Z")
        );
        assert_eq!(event.is_realtime_controlled, Some(true));
    }

    #[test]
    fn test_missing_stop_events_is_empty() {
        let response = DepartureMonitorResponse::from_value(&json!({ "version": "1" })).unwrap();
        assert!(response.stop_events.is_empty());
        assert_eq!(response.skipped, 0);
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(DepartureMonitorResponse::from_value(&json!([1, 2])).is_err());
        assert!(DepartureMonitorResponse::from_value(&json!({ "stopEvents": "none" })).is_err());
    }

    #[test]
    fn test_undecodable_events_are_skipped() {
        let body = json!({
            "stopEvents": [
                "not an event",
                { "departureTimePlanned": 42 },
                { "departureTimePlanned": "2026-03-02T21:15:00Z" }
            ]
        });

        let response = DepartureMonitorResponse::from_value(&body).unwrap();
        assert_eq!(response.skipped, 2);
        assert_eq!(response.stop_events.len(), 1);
        assert!(response.stop_events[0].transportation.is_none());
        assert!(response.stop_events[0].destination_name().is_none());
    }
}
