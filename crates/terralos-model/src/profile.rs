//! Line-of-sight profile data model.

use serde::{Deserialize, Serialize};

/// One sample along a sightline, from source toward target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LosProfilePoint {
    /// Distance from the source, in meters.
    pub distance_m: f64,
    /// Terrain elevation at this sample, in meters.
    pub terrain_elevation: f64,
    /// Elevation of the straight sightline at this sample, in meters.
    pub sightline_elevation: f64,
}

impl LosProfilePoint {
    /// True if terrain rises strictly above the sightline here.
    pub fn is_obstructed(&self) -> bool {
        self.terrain_elevation > self.sightline_elevation
    }
}

/// Outcome of a station-to-station sightline check.
///
/// The obstruction fields are `None` exactly when the line is clear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationLosResult {
    /// True if the sightline clears terrain everywhere.
    pub clear: bool,
    /// Fractional position (0-1) along the sightline of the first
    /// obstruction.
    pub obstruction_fraction: Option<f64>,
    /// Distance from the source, in meters, of the first obstruction.
    pub obstruction_distance_m: Option<f64>,
}

impl StationLosResult {
    /// A clear sightline.
    pub fn clear() -> Self {
        Self {
            clear: true,
            obstruction_fraction: None,
            obstruction_distance_m: None,
        }
    }

    /// A sightline obstructed at the given fraction and distance.
    pub fn obstructed(fraction: f64, distance_m: f64) -> Self {
        Self {
            clear: false,
            obstruction_fraction: Some(fraction),
            obstruction_distance_m: Some(distance_m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstruction_is_strict() {
        let level = LosProfilePoint {
            distance_m: 0.0,
            terrain_elevation: 10.0,
            sightline_elevation: 10.0,
        };
        assert!(!level.is_obstructed());

        let above = LosProfilePoint {
            terrain_elevation: 10.1,
            ..level
        };
        assert!(above.is_obstructed());
    }

    #[test]
    fn test_result_constructors() {
        let clear = StationLosResult::clear();
        assert!(clear.clear);
        assert!(clear.obstruction_fraction.is_none());

        let blocked = StationLosResult::obstructed(0.5, 550.0);
        assert!(!blocked.clear);
        assert_eq!(blocked.obstruction_fraction, Some(0.5));
        assert_eq!(blocked.obstruction_distance_m, Some(550.0));
    }
}
