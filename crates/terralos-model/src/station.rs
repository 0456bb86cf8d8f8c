//! Observer station configuration.

use serde::{Deserialize, Serialize};

use crate::GeoPoint2D;

/// The role of a station in an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    /// A fixed ground control station.
    GroundStation,
    /// A human or sensor observer.
    Observer,
    /// A relay/repeater site.
    Repeater,
}

/// Configuration for one observer station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Role of the station.
    pub kind: StationKind,
    /// Station position.
    pub location: GeoPoint2D,
    /// Ground elevation in meters, if known. `None` is resolved through the
    /// elevation access layer at analysis time.
    pub elevation: Option<f64>,
    /// Height of the antenna/eye above ground, in meters.
    pub elevation_offset: f64,
    /// Operating range of the station, in meters.
    pub range_meters: f64,
}

impl StationConfig {
    /// Create a station with an unknown ground elevation.
    pub fn new(kind: StationKind, location: GeoPoint2D, elevation_offset: f64, range_meters: f64) -> Self {
        Self {
            kind,
            location,
            elevation: None,
            elevation_offset,
            range_meters,
        }
    }

    /// Check the station holds finite coordinates and a positive range.
    pub fn is_valid(&self) -> bool {
        self.location.is_finite()
            && self.elevation_offset.is_finite()
            && self.range_meters.is_finite()
            && self.range_meters > 0.0
            && self.elevation.map_or(true, f64::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validity() {
        let mut s = StationConfig::new(
            StationKind::GroundStation,
            GeoPoint2D::new(-122.0, 47.0),
            2.0,
            5_000.0,
        );
        assert!(s.is_valid());

        s.range_meters = 0.0;
        assert!(!s.is_valid());

        s.range_meters = f64::NAN;
        assert!(!s.is_valid());
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&StationKind::GroundStation).unwrap();
        assert_eq!(json, "\"ground_station\"");
    }
}
