//! Geographic point types.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint2D {
    /// Longitude in decimal degrees (negative = west).
    pub lon: f64,
    /// Latitude in decimal degrees (positive = north).
    pub lat: f64,
}

impl GeoPoint2D {
    /// Create a new 2-D point.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Attach an elevation to this point.
    pub fn with_elevation(self, elevation: f64) -> GeoPoint3D {
        GeoPoint3D {
            lon: self.lon,
            lat: self.lat,
            elevation,
        }
    }
}

/// A WGS84 coordinate with an elevation in meters above the datum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint3D {
    /// Longitude in decimal degrees (negative = west).
    pub lon: f64,
    /// Latitude in decimal degrees (positive = north).
    pub lat: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

impl GeoPoint3D {
    /// Create a new 3-D point.
    pub fn new(lon: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lon,
            lat,
            elevation,
        }
    }

    /// Check that all three components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && self.elevation.is_finite()
    }

    /// Drop the elevation component.
    pub fn position(&self) -> GeoPoint2D {
        GeoPoint2D {
            lon: self.lon,
            lat: self.lat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_checks() {
        assert!(GeoPoint2D::new(-122.33, 47.61).is_finite());
        assert!(!GeoPoint2D::new(f64::NAN, 47.61).is_finite());
        assert!(!GeoPoint3D::new(-122.33, 47.61, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_with_elevation_round_trip() {
        let p = GeoPoint2D::new(10.0, 20.0).with_elevation(123.0);
        assert_eq!(p.elevation, 123.0);
        assert_eq!(p.position(), GeoPoint2D::new(10.0, 20.0));
    }
}
