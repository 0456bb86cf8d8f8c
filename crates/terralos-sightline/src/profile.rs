//! Full elevation profiles along a sightline.

use serde::{Deserialize, Serialize};
use terralos_elevation::ElevationService;
use terralos_model::{haversine_distance, interpolate, GeoPoint2D, GeoPoint3D, LosProfilePoint};

use crate::sampler::validate_endpoints;
use crate::{Result, SightlineError};

/// An ordered elevation profile along one sightline, source to target,
/// endpoints included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosProfile {
    /// Samples from source (distance 0) to target (full distance).
    pub points: Vec<LosProfilePoint>,
    /// True iff no sample has terrain above the sightline.
    pub clear: bool,
    /// Total segment length in meters.
    pub total_distance_m: f64,
}

impl LosProfile {
    /// Fractional position and distance of the first obstructed sample.
    ///
    /// Returns `None` when the profile is clear.
    pub fn first_obstruction(&self) -> Option<(f64, f64)> {
        let total = self.total_distance_m;
        self.points.iter().find(|p| p.is_obstructed()).map(|p| {
            let fraction = if total > 0.0 { p.distance_m / total } else { 0.0 };
            (fraction, p.distance_m)
        })
    }
}

/// Sample the full terrain/sightline profile between two 3-D positions.
///
/// The sample count derives from `ceil(total_distance / sample_distance_m)`
/// intervals; both endpoints are retained. All terrain elevations resolve
/// through one batched call to the elevation access layer. The sightline
/// interpolates from `source.elevation` to `target.elevation +
/// min_clearance`, the same geometry as
/// [`check_line_of_sight`](crate::check_line_of_sight).
pub fn los_profile(
    elevation: &ElevationService,
    source: GeoPoint3D,
    target: GeoPoint3D,
    sample_distance_m: f64,
    min_clearance: f64,
) -> Result<LosProfile> {
    validate_endpoints(source, target, min_clearance)?;
    if !sample_distance_m.is_finite() || sample_distance_m <= 0.0 {
        return Err(SightlineError::InvalidSampling(format!(
            "sample distance must be positive and finite, got {sample_distance_m}"
        )));
    }

    let total = haversine_distance(source.position(), target.position());
    let intervals = ((total / sample_distance_m).ceil() as usize).max(1);

    let positions: Vec<GeoPoint2D> = (0..=intervals)
        .map(|i| {
            let t = i as f64 / intervals as f64;
            interpolate(source.position(), target.position(), t)
        })
        .collect();
    let terrain = elevation.elevation_batch_at(&positions);

    let target_line_elevation = target.elevation + min_clearance;
    let points: Vec<LosProfilePoint> = terrain
        .into_iter()
        .enumerate()
        .map(|(i, terrain_elevation)| {
            let t = i as f64 / intervals as f64;
            LosProfilePoint {
                distance_m: t * total,
                terrain_elevation,
                sightline_elevation: source.elevation + t * (target_line_elevation - source.elevation),
            }
        })
        .collect();

    let clear = !points.iter().any(LosProfilePoint::is_obstructed);
    Ok(LosProfile {
        points,
        clear,
        total_distance_m: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use crate::check_line_of_sight;
    use crate::test_support::{flat_service, spike_service};

    fn endpoints() -> (GeoPoint3D, GeoPoint3D) {
        (
            GeoPoint3D::new(0.0, 0.0, 10.0),
            GeoPoint3D::new(0.01, 0.0, 10.0), // ~1.1 km east
        )
    }

    #[test]
    fn test_flat_profile_is_clear_and_complete() {
        let service = flat_service(0.0);
        let (source, target) = endpoints();
        let profile = los_profile(&service, source, target, 10.0, 1.0).unwrap();

        assert!(profile.clear);
        assert!(profile.first_obstruction().is_none());

        // ceil(1113 / 10) intervals plus both endpoints
        let expected_points = (profile.total_distance_m / 10.0).ceil() as usize + 1;
        assert_eq!(profile.points.len(), expected_points);

        let first = profile.points.first().unwrap();
        let last = profile.points.last().unwrap();
        assert_eq!(first.distance_m, 0.0);
        assert_eq!(first.sightline_elevation, 10.0);
        assert_relative_eq!(last.distance_m, profile.total_distance_m);
        // Clearance raises the target end of the line only
        assert_relative_eq!(last.sightline_elevation, 11.0);
    }

    #[test]
    fn test_midpoint_spike_obstruction_position() {
        // 50 m spike at the midpoint of a ~1113 m segment where the
        // sightline sits at 10.5 m
        let spike_center = GeoPoint2D::new(0.005, 0.0);
        let service = spike_service(spike_center, 60.0, 50.0);
        let (source, target) = endpoints();
        let profile = los_profile(&service, source, target, 10.0, 1.0).unwrap();

        assert!(!profile.clear);
        let (fraction, distance) = profile.first_obstruction().unwrap();
        // Within one sample interval of the true spike position
        assert_abs_diff_eq!(fraction, 0.5, epsilon = 0.08);
        assert_abs_diff_eq!(distance, 550.0, epsilon = 80.0);
    }

    #[test]
    fn test_spike_at_arbitrary_fraction() {
        let (source, target) = endpoints();
        let total = haversine_distance(source.position(), target.position());
        for t in [0.2, 0.7] {
            let spike_center = interpolate(source.position(), target.position(), t);
            let service = spike_service(spike_center, 40.0, 100.0);
            let profile = los_profile(&service, source, target, 10.0, 1.0).unwrap();
            assert!(!profile.clear);
            let (fraction, distance) = profile.first_obstruction().unwrap();
            let interval = 10.0 / total;
            // Obstruction reported within the spike footprint plus one
            // sample interval
            assert!(
                (fraction - t).abs() <= 40.0 / total + interval,
                "spike at {t}, reported {fraction}"
            );
            assert!((distance - t * total).abs() <= 40.0 + 10.0);
        }
    }

    #[test]
    fn test_check_and_profile_agree() {
        let (source, target) = endpoints();
        let cases = [
            flat_service(0.0),
            flat_service(10.2),
            spike_service(GeoPoint2D::new(0.005, 0.0), 60.0, 50.0),
        ];
        for service in &cases {
            // Match the adaptive interior sampling of check_line_of_sight
            // with an equivalent profile granularity
            let clear_check = check_line_of_sight(service, source, target, 1.0, Some(100))
                .unwrap();
            let profile = los_profile(service, source, target, 10.0, 1.0).unwrap();
            assert_eq!(
                clear_check, profile.clear,
                "check and profile disagree for a case"
            );
        }
    }

    #[test]
    fn test_invalid_sample_distance_rejected() {
        let service = flat_service(0.0);
        let (source, target) = endpoints();
        for bad in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                los_profile(&service, source, target, bad, 1.0),
                Err(SightlineError::InvalidSampling(_))
            ));
        }
    }

    #[test]
    fn test_zero_length_segment() {
        let service = flat_service(0.0);
        let p = GeoPoint3D::new(0.0, 0.0, 10.0);
        let profile = los_profile(&service, p, p, 10.0, 1.0).unwrap();
        assert!(profile.clear);
        assert_eq!(profile.total_distance_m, 0.0);
        assert_eq!(profile.points.len(), 2);
    }
}
