//! Geographic bounding boxes.

use serde::{Deserialize, Serialize};

use crate::{meters_per_degree_lon, GeoPoint2D, METERS_PER_DEGREE_LAT};

/// An axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum longitude (west edge).
    pub min_lon: f64,
    /// Minimum latitude (south edge).
    pub min_lat: f64,
    /// Maximum longitude (east edge).
    pub max_lon: f64,
    /// Maximum latitude (north edge).
    pub max_lat: f64,
}

impl BoundingBox {
    /// Bounding box of the disc of `radius_m` meters around `center`.
    pub fn around(center: GeoPoint2D, radius_m: f64) -> Self {
        let dlat = radius_m / METERS_PER_DEGREE_LAT;
        let dlon = radius_m / meters_per_degree_lon(center.lat).max(1.0);
        Self {
            min_lon: center.lon - dlon,
            min_lat: center.lat - dlat,
            max_lon: center.lon + dlon,
            max_lat: center.lat + dlat,
        }
    }

    /// Smallest box containing every point. Returns `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint2D]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_lon: first.lon,
            min_lat: first.lat,
            max_lon: first.lon,
            max_lat: first.lat,
        };
        for p in &points[1..] {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    /// Union of two boxes.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Expand the box by a metric margin on all sides.
    pub fn expand_by_meters(&self, margin_m: f64) -> Self {
        let dlat = margin_m / METERS_PER_DEGREE_LAT;
        let dlon = margin_m / meters_per_degree_lon(self.center().lat).max(1.0);
        Self {
            min_lon: self.min_lon - dlon,
            min_lat: self.min_lat - dlat,
            max_lon: self.max_lon + dlon,
            max_lat: self.max_lat + dlat,
        }
    }

    /// Geometric center of the box.
    pub fn center(&self) -> GeoPoint2D {
        GeoPoint2D {
            lon: (self.min_lon + self.max_lon) / 2.0,
            lat: (self.min_lat + self.max_lat) / 2.0,
        }
    }

    /// Check if a coordinate is within the box.
    pub fn contains(&self, p: GeoPoint2D) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lon >= self.min_lon && p.lon <= self.max_lon
    }

    /// Check that the box is finite, non-inverted, and inside the valid
    /// longitude/latitude domain.
    pub fn is_valid(&self) -> bool {
        self.min_lon.is_finite()
            && self.min_lat.is_finite()
            && self.max_lon.is_finite()
            && self.max_lat.is_finite()
            && self.min_lon < self.max_lon
            && self.min_lat < self.max_lat
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0
            && self.min_lat >= -90.0
            && self.max_lat <= 90.0
    }
}
