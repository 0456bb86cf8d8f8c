//! Clear/obstructed sightline checks.

use terralos_elevation::ElevationService;
use terralos_model::{haversine_distance, interpolate, GeoPoint3D};

use crate::{Result, SightlineError};

/// Target spacing between adaptive samples, in meters.
pub const DEFAULT_SAMPLE_SPACING_M: f64 = 50.0;

/// Fewest interior samples taken on very short segments.
const MIN_SAMPLES: usize = 5;

/// Most interior samples taken on long segments; bounds the cost of a
/// single check.
const MAX_SAMPLES: usize = 20;

/// Check whether the sightline from `source` to `target` clears terrain.
///
/// Samples `samples` intermediate positions (endpoints excluded) along the
/// segment; when `samples` is `None` the count adapts to segment length as
/// `clamp(distance / 50 m, 5, 20)`. The sightline elevation interpolates
/// from `source.elevation` to `target.elevation + min_clearance` — the
/// clearance applies to the observed end only. The check short-circuits on
/// the first sample where terrain strictly exceeds the sightline.
///
/// Non-finite inputs fail fast with [`SightlineError::InvalidCoordinate`];
/// callers treat that as obstructed.
pub fn check_line_of_sight(
    elevation: &ElevationService,
    source: GeoPoint3D,
    target: GeoPoint3D,
    min_clearance: f64,
    samples: Option<usize>,
) -> Result<bool> {
    validate_endpoints(source, target, min_clearance)?;

    let distance = haversine_distance(source.position(), target.position());
    let samples = match samples {
        Some(0) => {
            return Err(SightlineError::InvalidSampling(
                "sample count must be at least 1".into(),
            ))
        }
        Some(n) => n,
        None => ((distance / DEFAULT_SAMPLE_SPACING_M) as usize).clamp(MIN_SAMPLES, MAX_SAMPLES),
    };

    let target_line_elevation = target.elevation + min_clearance;
    for i in 1..=samples {
        let t = i as f64 / (samples + 1) as f64;
        let position = interpolate(source.position(), target.position(), t);
        let terrain = elevation.elevation_at(position);
        let sightline = source.elevation + t * (target_line_elevation - source.elevation);
        if terrain > sightline {
            return Ok(false);
        }
    }
    Ok(true)
}

pub(crate) fn validate_endpoints(
    source: GeoPoint3D,
    target: GeoPoint3D,
    min_clearance: f64,
) -> Result<()> {
    if !source.is_finite() {
        return Err(SightlineError::InvalidCoordinate {
            context: format!("source ({}, {}, {})", source.lon, source.lat, source.elevation),
        });
    }
    if !target.is_finite() {
        return Err(SightlineError::InvalidCoordinate {
            context: format!("target ({}, {}, {})", target.lon, target.lat, target.elevation),
        });
    }
    if !min_clearance.is_finite() {
        return Err(SightlineError::InvalidCoordinate {
            context: format!("clearance {min_clearance}"),
        });
    }
    Ok(())
}
