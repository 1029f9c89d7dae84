//! Per-tick aggregate of all trip results

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::TripResult;
use crate::value_objects::TripKey;

/// Trip results keyed by trip, in insertion order
///
/// Serializes as a JSON object whose keys keep the order trips were
/// inserted in. Keys are unique; inserting an existing key replaces the
/// entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripResults {
    entries: Vec<(TripKey, TripResult)>,
}

impl TripResults {
    /// Create an empty result set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a result, returning the one it replaced
    pub fn insert(&mut self, key: TripKey, result: TripResult) -> Option<TripResult> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, result));
        }
        self.entries.push((key, result));
        None
    }

    /// Result for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TripResult> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, result)| result)
    }

    /// Whether `key` has a result
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of trips with results
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no trip produced a result
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &TripKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&TripKey, &TripResult)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Total departures across all trips
    #[must_use]
    pub fn departure_count(&self) -> usize {
        self.entries.iter().map(|(_, r)| r.departures.len()).sum()
    }
}

impl FromIterator<(TripKey, TripResult)> for TripResults {
    fn from_iter<I: IntoIterator<Item = (TripKey, TripResult)>>(iter: I) -> Self {
        let mut results = Self::new();
        for (key, result) in iter {
            results.insert(key, result);
        }
        results
    }
}

impl Serialize for TripResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, result) in &self.entries {
            map.serialize_entry(key, result)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TripResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TripResultsVisitor;

        impl<'de> Visitor<'de> for TripResultsVisitor {
            type Value = TripResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of trip keys to trip results")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut results = TripResults::new();
                while let Some((key, value)) = access.next_entry::<TripKey, TripResult>()? {
                    results.insert(key, value);
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(TripResultsVisitor)
    }
}

/// Everything published for one successful poll tick
///
/// Built fresh on every tick and replaces the previous snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    /// Departures per trip
    pub departures: TripResults,
    /// Completion time of the tick, `HH:mm:ss` transit-local
    pub last_updated: String,
}

impl AggregateSnapshot {
    /// Create a snapshot
    #[must_use]
    pub fn new(departures: TripResults, last_updated: impl Into<String>) -> Self {
        Self {
            departures,
            last_updated: last_updated.into(),
        }
    }
}
