//! Chunked visibility aggregation passes.

use terralos_elevation::ElevationService;
use terralos_model::{
    haversine_distance, interpolate, GeoPoint3D, GridCell, StationConfig, StationLosResult,
};
use terralos_sightline::{check_line_of_sight, los_profile};
use tracing::warn;

use crate::progress::ProgressReporter;
use crate::{AnalysisError, CancelFlag, Result};

/// Cells processed between cancellation checks and yields.
pub(crate) const CHUNK_SIZE: usize = 200;

/// Spacing of flight-path samples used for path-coverage checks, meters.
const PATH_SAMPLE_SPACING_M: f64 = 100.0;

/// Profile sampling distance for station-to-station checks, meters.
const LINK_SAMPLE_DISTANCE_M: f64 = 10.0;

/// Clearance required of a station-to-station sightline, meters.
const LINK_CLEARANCE_M: f64 = 3.0;

/// Run a per-cell pass in fixed-size chunks, checking the cancel flag and
/// yielding the thread between chunks.
pub(crate) fn chunked_pass<F>(
    cells: &mut [GridCell],
    cancel: &CancelFlag,
    progress: &mut ProgressReporter<'_>,
    mut per_cell: F,
) -> Result<()>
where
    F: FnMut(&mut GridCell),
{
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }
    let total = cells.len();
    let mut done = 0;
    for chunk in cells.chunks_mut(CHUNK_SIZE) {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        for cell in chunk.iter_mut() {
            per_cell(cell);
        }
        done += chunk.len();
        progress.report(done, total);
        std::thread::yield_now();
    }
    Ok(())
}

/// Resolve a station's 3-D observing position: ground elevation (known or
/// queried) plus the antenna/eye offset.
pub(crate) fn resolve_station_position(
    elevation: &ElevationService,
    station: &StationConfig,
) -> GeoPoint3D {
    let ground = station
        .elevation
        .unwrap_or_else(|| elevation.elevation_at(station.location));
    station
        .location
        .with_elevation(ground + station.elevation_offset)
}

/// Single-station pass: each cell is fully visible (100) or not (0).
///
/// Per-cell sampler failures are logged and the cell left non-visible
/// rather than aborting the run.
pub(crate) fn station_pass(
    elevation: &ElevationService,
    observer: GeoPoint3D,
    min_clearance: f64,
    cells: &mut [GridCell],
    cancel: &CancelFlag,
    progress: &mut ProgressReporter<'_>,
) -> Result<()> {
    chunked_pass(cells, cancel, progress, |cell| {
        let target = cell.center.with_elevation(cell.elevation);
        match check_line_of_sight(elevation, observer, target, min_clearance, None) {
            Ok(true) => cell.set_visibility(100.0),
            Ok(false) => cell.set_visibility(0.0),
            Err(err) => {
                warn!(cell = cell.id, %err, "sightline check failed, skipping cell");
                cell.set_visibility(0.0);
            }
        }
    })
}

/// Observer-count tier used by merged analyses: a fixed three-level scheme
/// independent of the total station count.
pub(crate) fn merged_tier_percent(visible: usize) -> f64 {
    match visible {
        0 => 0.0,
        1 => 50.0,
        _ => 100.0,
    }
}

/// Merged multi-station pass: counts observers with clear sight of each
/// cell, respecting each station's own range, then applies the tier.
/// `fully_visible` requires every station to see the cell.
pub(crate) fn merged_pass(
    elevation: &ElevationService,
    stations: &[(StationConfig, GeoPoint3D)],
    min_clearance: f64,
    cells: &mut [GridCell],
    cancel: &CancelFlag,
    progress: &mut ProgressReporter<'_>,
) -> Result<()> {
    let station_count = stations.len();
    chunked_pass(cells, cancel, progress, |cell| {
        let target = cell.center.with_elevation(cell.elevation);
        let mut visible = 0usize;
        for (config, observer) in stations {
            // Stations outside their own range never contribute
            if haversine_distance(config.location, cell.center) > config.range_meters {
                continue;
            }
            match check_line_of_sight(elevation, *observer, target, min_clearance, None) {
                Ok(true) => visible += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(cell = cell.id, %err, "sightline check failed for one station, skipping it");
                }
            }
        }
        cell.set_visibility(merged_tier_percent(visible));
        cell.visible_observer_count = Some(visible as u32);
        // Stricter predicate than the percentage tier
        cell.fully_visible = visible == station_count;
    })
}

/// Path-coverage pass: each cell's visibility is the percentage of in-range
/// flight-path samples with clear sight of it. A cell with no in-range
/// samples scores 0.
pub(crate) fn path_pass(
    elevation: &ElevationService,
    path_samples: &[GeoPoint3D],
    proximity_range: f64,
    min_clearance: f64,
    cells: &mut [GridCell],
    cancel: &CancelFlag,
    progress: &mut ProgressReporter<'_>,
) -> Result<()> {
    chunked_pass(cells, cancel, progress, |cell| {
        let target = cell.center.with_elevation(cell.elevation);
        let mut in_range = 0usize;
        let mut seen = 0usize;
        for sample in path_samples {
            if haversine_distance(sample.position(), cell.center) > proximity_range {
                continue;
            }
            in_range += 1;
            match check_line_of_sight(elevation, *sample, target, min_clearance, None) {
                Ok(true) => seen += 1,
                Ok(false) => {}
                Err(err) => {
                    // The failed sample still counts toward the denominator;
                    // only clear sightlines enter the numerator.
                    warn!(cell = cell.id, %err, "sightline check failed for one path sample");
                }
            }
        }
        if in_range == 0 {
            cell.set_visibility(0.0);
        } else {
            cell.set_visibility(100.0 * seen as f64 / in_range as f64);
        }
    })
}

/// Resample a flight path at a fixed spacing, interpolating altitude
/// linearly along each segment. Vertices are always retained.
pub(crate) fn resample_path(path: &[GeoPoint3D]) -> Vec<GeoPoint3D> {
    let mut samples: Vec<GeoPoint3D> = Vec::new();
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = haversine_distance(a.position(), b.position());
        let steps = ((length / PATH_SAMPLE_SPACING_M).ceil() as usize).max(1);
        for i in 0..steps {
            let t = i as f64 / steps as f64;
            let position = interpolate(a.position(), b.position(), t);
            samples.push(position.with_elevation(a.elevation + t * (b.elevation - a.elevation)));
        }
    }
    if let Some(last) = path.last() {
        samples.push(*last);
    }
    samples
}

/// Station-to-station check over a fine fixed-granularity profile.
pub(crate) fn station_link_check(
    elevation: &ElevationService,
    from: GeoPoint3D,
    to: GeoPoint3D,
) -> std::result::Result<StationLosResult, terralos_sightline::SightlineError> {
    let profile = los_profile(elevation, from, to, LINK_SAMPLE_DISTANCE_M, LINK_CLEARANCE_M)?;
    Ok(match profile.first_obstruction() {
        None => StationLosResult::clear(),
        Some((fraction, distance)) => StationLosResult::obstructed(fraction, distance),
    })
}
