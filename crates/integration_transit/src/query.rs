//! Departure monitor query parameters

use std::fmt;

/// TfNSW means-of-transport codes used by the `exclMOT_<code>` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeansOfTransport {
    /// Sydney Trains and NSW TrainLink
    Train,
    /// Sydney Metro
    Metro,
    /// Light rail
    LightRail,
    /// Bus
    Bus,
    /// Coach
    Coach,
    /// Ferry
    Ferry,
    /// School bus
    SchoolBus,
}

impl MeansOfTransport {
    /// Every code the API distinguishes
    pub const ALL: [Self; 7] = [
        Self::Train,
        Self::Metro,
        Self::LightRail,
        Self::Bus,
        Self::Coach,
        Self::Ferry,
        Self::SchoolBus,
    ];

    /// Numeric code
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Train => 1,
            Self::Metro => 2,
            Self::LightRail => 4,
            Self::Bus => 5,
            Self::Coach => 7,
            Self::Ferry => 9,
            Self::SchoolBus => 11,
        }
    }

    /// Query parameter that excludes this mode
    #[must_use]
    pub fn exclusion_param(self) -> String {
        format!("exclMOT_{}", self.code())
    }
}

/// Lookup performed by the departure monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepartureMode {
    /// Platform lookup restricted to trains
    Train,
    /// Stop lookup restricted to buses
    Bus,
}

impl DepartureMode {
    /// Value of the `type_dm` parameter
    #[must_use]
    pub const fn type_dm(self) -> &'static str {
        match self {
            Self::Train => "platform",
            Self::Bus => "stop",
        }
    }

    /// The one means of transport this lookup keeps
    #[must_use]
    pub const fn kept_means(self) -> MeansOfTransport {
        match self {
            Self::Train => MeansOfTransport::Train,
            Self::Bus => MeansOfTransport::Bus,
        }
    }

    /// Means of transport excluded from this lookup
    pub fn excluded_means(self) -> impl Iterator<Item = MeansOfTransport> {
        let kept = self.kept_means();
        MeansOfTransport::ALL.into_iter().filter(move |m| *m != kept)
    }

    /// Label used in logs and diagnostic file names
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Bus => "bus",
        }
    }
}

impl fmt::Display for DepartureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Full query string for a departure monitor request
///
/// `itd_date` is `YYYYMMDD` and `itd_time` is `HHmm`, both transit-local.
/// Values are percent-encoded by the HTTP client.
#[must_use]
pub fn departure_monitor_params(
    mode: DepartureMode,
    name: &str,
    itd_date: &str,
    itd_time: &str,
) -> Vec<(String, String)> {
    let fixed = [
        ("outputFormat", "rapidJSON"),
        ("coordOutputFormat", "EPSG:4326"),
        ("mode", "direct"),
        ("TfNSWDM", "true"),
        ("version", "10.2.1.42"),
    ];

    let mut params: Vec<(String, String)> = fixed
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

    params.push(("itdDate".to_string(), itd_date.to_string()));
    params.push(("itdTime".to_string(), itd_time.to_string()));
    params.push(("type_dm".to_string(), mode.type_dm().to_string()));
    params.push(("name_dm".to_string(), name.to_string()));
    params.push(("excludedMeans".to_string(), "checkbox".to_string()));

    for means in mode.excluded_means() {
        params.push((means.exclusion_param(), "1".to_string()));
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn train_query_uses_platform_lookup() {
        let params = departure_monitor_params(DepartureMode::Train, "2000274", "20260302", "0815");
        assert_eq!(value(&params, "type_dm"), Some("platform"));
        assert_eq!(value(&params, "name_dm"), Some("2000274"));
        assert_eq!(value(&params, "itdDate"), Some("20260302"));
        assert_eq!(value(&params, "itdTime"), Some("0815"));
        assert_eq!(value(&params, "outputFormat"), Some("rapidJSON"));
        assert_eq!(value(&params, "coordOutputFormat"), Some("EPSG:4326"));
        assert_eq!(value(&params, "excludedMeans"), Some("checkbox"));
    }

    #[test]
    fn train_query_excludes_everything_but_trains() {
        let params = departure_monitor_params(DepartureMode::Train, "1", "20260302", "0815");
        assert_eq!(value(&params, "exclMOT_1"), None);
        for code in [2, 4, 5, 7, 9, 11] {
            assert_eq!(value(&params, &format!("exclMOT_{code}")), Some("1"));
        }
    }

    #[test]
    fn bus_query_excludes_everything_but_buses() {
        let params = departure_monitor_params(DepartureMode::Bus, "200060", "20260302", "0815");
        assert_eq!(value(&params, "type_dm"), Some("stop"));
        assert_eq!(value(&params, "exclMOT_5"), None);
        for code in [1, 2, 4, 7, 9, 11] {
            assert_eq!(value(&params, &format!("exclMOT_{code}")), Some("1"));
        }
    }

    #[test]
    fn excluded_means_never_contains_kept() {
        for mode in [DepartureMode::Train, DepartureMode::Bus] {
            assert!(mode.excluded_means().all(|m| m != mode.kept_means()));
            assert_eq!(mode.excluded_means().count(), MeansOfTransport::ALL.len() - 1);
        }
    }

    #[test]
    fn mode_labels() {
        assert_eq!(DepartureMode::Train.to_string(), "train");
        assert_eq!(DepartureMode::Bus.to_string(), "bus");
    }
}
