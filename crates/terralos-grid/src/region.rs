//! Region masks for grid generation.

use serde::{Deserialize, Serialize};
use terralos_model::{
    haversine_distance, point_segment_distance, BoundingBox, GeoPoint2D, StationConfig,
};

use crate::{GridError, Result};

/// The spatial mask an analysis grid is generated over.
///
/// Each analysis kind carries exactly the fields it needs; there is no
/// catch-all options bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GridRegion {
    /// Disc of `range_meters` around a center point.
    PointRange {
        /// Disc center.
        center: GeoPoint2D,
        /// Disc radius in meters.
        range_meters: f64,
    },
    /// Buffer of `corridor_meters` around a polyline.
    PathCorridor {
        /// Polyline vertices, at least two.
        path: Vec<GeoPoint2D>,
        /// Corridor half-width in meters.
        corridor_meters: f64,
    },
    /// Union of the per-station range discs.
    UnionOfRanges {
        /// Participating stations, at least two.
        stations: Vec<StationConfig>,
    },
}

impl GridRegion {
    /// Validate the region description. Fails fast before any sampling work.
    pub fn validate(&self) -> Result<()> {
        match self {
            GridRegion::PointRange { center, range_meters } => {
                if !center.is_finite() {
                    return Err(GridError::InvalidRegion(
                        "point-range center has non-finite coordinates".into(),
                    ));
                }
                if !range_meters.is_finite() || *range_meters <= 0.0 {
                    return Err(GridError::InvalidRegion(format!(
                        "point-range radius must be positive and finite, got {range_meters}"
                    )));
                }
            }
            GridRegion::PathCorridor { path, corridor_meters } => {
                if path.len() < 2 {
                    return Err(GridError::InvalidRegion(format!(
                        "path needs at least 2 vertices, got {}",
                        path.len()
                    )));
                }
                if let Some(bad) = path.iter().find(|p| !p.is_finite()) {
                    return Err(GridError::InvalidRegion(format!(
                        "path vertex has non-finite coordinates: ({}, {})",
                        bad.lon, bad.lat
                    )));
                }
                if !corridor_meters.is_finite() || *corridor_meters <= 0.0 {
                    return Err(GridError::InvalidRegion(format!(
                        "corridor width must be positive and finite, got {corridor_meters}"
                    )));
                }
            }
            GridRegion::UnionOfRanges { stations } => {
                if stations.len() < 2 {
                    return Err(GridError::InvalidRegion(format!(
                        "union-of-ranges needs at least 2 stations, got {}",
                        stations.len()
                    )));
                }
                if let Some(bad) = stations.iter().position(|s| !s.is_valid()) {
                    return Err(GridError::InvalidRegion(format!(
                        "station {bad} has invalid coordinates or range"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Bounding box of the region, validated against the lat/lon domain.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        let bbox = match self {
            GridRegion::PointRange { center, range_meters } => {
                BoundingBox::around(*center, *range_meters)
            }
            GridRegion::PathCorridor { path, corridor_meters } => BoundingBox::from_points(path)
                .ok_or_else(|| GridError::InvalidRegion("empty path".into()))?
                .expand_by_meters(*corridor_meters),
            GridRegion::UnionOfRanges { stations } => {
                let mut boxes = stations
                    .iter()
                    .map(|s| BoundingBox::around(s.location, s.range_meters));
                let first = boxes
                    .next()
                    .ok_or_else(|| GridError::InvalidRegion("no stations".into()))?;
                boxes.fold(first, |acc, b| acc.union(&b))
            }
        };

        if !bbox.is_valid() {
            return Err(GridError::bounds(&bbox));
        }
        Ok(bbox)
    }

    /// Check whether a lattice point falls inside the region mask.
    pub fn contains(&self, p: GeoPoint2D) -> bool {
        match self {
            GridRegion::PointRange { center, range_meters } => {
                haversine_distance(p, *center) <= *range_meters
            }
            GridRegion::PathCorridor { path, corridor_meters } => path
                .windows(2)
                .any(|seg| point_segment_distance(p, seg[0], seg[1]) <= *corridor_meters),
            GridRegion::UnionOfRanges { stations } => stations
                .iter()
                .any(|s| haversine_distance(p, s.location) <= s.range_meters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terralos_model::StationKind;

    fn station(lon: f64, lat: f64, range: f64) -> StationConfig {
        StationConfig::new(StationKind::Observer, GeoPoint2D::new(lon, lat), 2.0, range)
    }

    #[test]
    fn test_point_range_rejects_bad_radius() {
        for radius in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let region = GridRegion::PointRange {
                center: GeoPoint2D::new(0.0, 0.0),
                range_meters: radius,
            };
            assert!(region.validate().is_err(), "radius {radius} should be rejected");
        }
    }

    #[test]
    fn test_path_corridor_rejects_degenerate_path() {
        let region = GridRegion::PathCorridor {
            path: vec![GeoPoint2D::new(0.0, 0.0)],
            corridor_meters: 100.0,
        };
        assert!(matches!(region.validate(), Err(GridError::InvalidRegion(_))));
    }

    #[test]
    fn test_union_rejects_single_station() {
        let region = GridRegion::UnionOfRanges {
            stations: vec![station(0.0, 0.0, 1_000.0)],
        };
        assert!(region.validate().is_err());
    }

    #[test]
    fn test_point_range_mask() {
        let region = GridRegion::PointRange {
            center: GeoPoint2D::new(0.0, 0.0),
            range_meters: 1_000.0,
        };
        assert!(region.contains(GeoPoint2D::new(0.0, 0.0)));
        assert!(region.contains(GeoPoint2D::new(0.005, 0.0))); // ~557 m east
        assert!(!region.contains(GeoPoint2D::new(0.02, 0.0))); // ~2.2 km east
    }

    #[test]
    fn test_corridor_mask() {
        let region = GridRegion::PathCorridor {
            path: vec![GeoPoint2D::new(0.0, 0.0), GeoPoint2D::new(0.02, 0.0)],
            corridor_meters: 300.0,
        };
        // On the path
        assert!(region.contains(GeoPoint2D::new(0.01, 0.0)));
        // ~222 m north of the path
        assert!(region.contains(GeoPoint2D::new(0.01, 0.002)));
        // ~1.1 km north of the path
        assert!(!region.contains(GeoPoint2D::new(0.01, 0.01)));
    }

    #[test]
    fn test_union_mask_and_bbox() {
        let region = GridRegion::UnionOfRanges {
            stations: vec![station(0.0, 0.0, 1_000.0), station(0.05, 0.0, 1_000.0)],
        };
        region.validate().unwrap();
        assert!(region.contains(GeoPoint2D::new(0.0, 0.001)));
        assert!(region.contains(GeoPoint2D::new(0.05, 0.001)));
        // Between the discs, covered by neither
        assert!(!region.contains(GeoPoint2D::new(0.025, 0.0)));

        let bbox = region.bounding_box().unwrap();
        assert!(bbox.contains(GeoPoint2D::new(0.0, 0.0)));
        assert!(bbox.contains(GeoPoint2D::new(0.05, 0.0)));
    }

    #[test]
    fn test_bounding_box_domain_check() {
        let region = GridRegion::PointRange {
            center: GeoPoint2D::new(0.0, 89.9999),
            range_meters: 100_000.0,
        };
        region.validate().unwrap();
        assert!(matches!(region.bounding_box(), Err(GridError::Bounds { .. })));
    }
}
