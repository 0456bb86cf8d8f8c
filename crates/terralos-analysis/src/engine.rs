//! The analysis orchestrator.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use terralos_elevation::ElevationService;
use terralos_grid::{generate_grid, GridRegion};
use terralos_model::{
    AnalysisResult, AnalysisStats, GeoPoint2D, GridCell, StationConfig, TerrainStats,
};
use tracing::info;

use crate::progress::ProgressReporter;
use crate::requests::{
    MergedCoverageRequest, PathCoverageRequest, StationCoverageRequest, StationLinkRequest,
    TerrainOverviewRequest,
};
use crate::terrain::{terrain_stats, terrain_stats_with_progress};
use crate::visibility::{
    merged_pass, path_pass, resample_path, resolve_station_position, station_link_check,
    station_pass,
};
use crate::{AnalysisError, CancelFlag, ProgressSink, Result};

/// The kind of an analysis run. Only one analysis of a given kind may be in
/// flight per engine at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    /// Single-station coverage grid.
    StationCoverage,
    /// Multi-station merged coverage grid.
    MergedCoverage,
    /// Flight-path corridor coverage grid.
    PathCoverage,
    /// Station-to-station sightline check.
    StationLink,
    /// Terrain statistics only.
    TerrainOverview,
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnalysisKind::StationCoverage => "station-coverage",
            AnalysisKind::MergedCoverage => "merged-coverage",
            AnalysisKind::PathCoverage => "path-coverage",
            AnalysisKind::StationLink => "station-link",
            AnalysisKind::TerrainOverview => "terrain-overview",
        };
        write!(f, "{name}")
    }
}

/// Orchestrates analysis runs over a shared elevation service.
///
/// One entry point per analysis kind; each takes a tagged request, a
/// [`CancelFlag`] owned by the caller, and an optional progress sink.
/// Invalid requests fail before any sampling work. A second invocation of a
/// kind already in flight is rejected with
/// [`AnalysisError::AlreadyInProgress`] rather than queued or interleaved.
pub struct AnalysisEngine {
    elevation: Arc<ElevationService>,
    in_flight: Mutex<HashSet<AnalysisKind>>,
}

/// Removes its kind from the in-flight set when the run ends, on success
/// and error alike.
struct InFlightGuard<'a> {
    engine: &'a AnalysisEngine,
    kind: AnalysisKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.engine
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.kind);
    }
}

impl AnalysisEngine {
    /// Create an engine over a shared elevation service.
    pub fn new(elevation: Arc<ElevationService>) -> Self {
        Self {
            elevation,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The elevation service this engine queries.
    pub fn elevation(&self) -> &ElevationService {
        &self.elevation
    }

    /// Coverage of one station's range disc.
    pub fn station_coverage(
        &self,
        request: &StationCoverageRequest,
        cancel: &CancelFlag,
        progress: Option<&ProgressSink>,
    ) -> Result<AnalysisResult> {
        let _guard = self.begin(AnalysisKind::StationCoverage)?;
        check_not_cancelled(cancel)?;
        validate_station(&request.station, "station")?;
        validate_clearance(request.min_clearance_meters)?;

        let started = Instant::now();
        let region = GridRegion::PointRange {
            center: request.station.location,
            range_meters: request.station.range_meters,
        };
        let mut cells = generate_grid(&region, request.cell_size_meters, &self.elevation)?;
        let observer = resolve_station_position(&self.elevation, &request.station);

        let mut reporter = ProgressReporter::new(progress);
        station_pass(
            &self.elevation,
            observer,
            request.min_clearance_meters,
            &mut cells,
            cancel,
            &mut reporter,
        )?;
        let terrain = if request.include_terrain_stats {
            Some(terrain_stats(&cells, cancel)?)
        } else {
            None
        };
        reporter.finish();

        let stats = summarize(&cells, started, terrain);
        log_completion(AnalysisKind::StationCoverage, &stats);
        Ok(AnalysisResult {
            cells,
            stats,
            station_los: None,
        })
    }

    /// Merged coverage from several stations over the union of their
    /// ranges.
    pub fn merged_coverage(
        &self,
        request: &MergedCoverageRequest,
        cancel: &CancelFlag,
        progress: Option<&ProgressSink>,
    ) -> Result<AnalysisResult> {
        let _guard = self.begin(AnalysisKind::MergedCoverage)?;
        check_not_cancelled(cancel)?;
        if request.stations.len() < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "merged coverage needs at least 2 stations, got {}",
                request.stations.len()
            )));
        }
        for (i, station) in request.stations.iter().enumerate() {
            validate_station(station, &format!("station {i}"))?;
        }
        validate_clearance(request.min_clearance_meters)?;

        let started = Instant::now();
        let region = GridRegion::UnionOfRanges {
            stations: request.stations.clone(),
        };
        let mut cells = generate_grid(&region, request.cell_size_meters, &self.elevation)?;

        // Seed the cache with one batched call before resolving positions
        let unresolved: Vec<GeoPoint2D> = request
            .stations
            .iter()
            .filter(|s| s.elevation.is_none())
            .map(|s| s.location)
            .collect();
        if !unresolved.is_empty() {
            self.elevation.elevation_batch_at(&unresolved);
        }
        let stations: Vec<_> = request
            .stations
            .iter()
            .map(|s| (s.clone(), resolve_station_position(&self.elevation, s)))
            .collect();

        let mut reporter = ProgressReporter::new(progress);
        merged_pass(
            &self.elevation,
            &stations,
            request.min_clearance_meters,
            &mut cells,
            cancel,
            &mut reporter,
        )?;
        reporter.finish();

        let stats = summarize(&cells, started, None);
        log_completion(AnalysisKind::MergedCoverage, &stats);
        Ok(AnalysisResult {
            cells,
            stats,
            station_los: None,
        })
    }

    /// Coverage of the corridor around a flight path.
    pub fn path_coverage(
        &self,
        request: &PathCoverageRequest,
        cancel: &CancelFlag,
        progress: Option<&ProgressSink>,
    ) -> Result<AnalysisResult> {
        let _guard = self.begin(AnalysisKind::PathCoverage)?;
        check_not_cancelled(cancel)?;
        if request.path.len() < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "flight path needs at least 2 vertices, got {}",
                request.path.len()
            )));
        }
        if let Some(bad) = request.path.iter().find(|p| !p.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "flight path vertex has non-finite coordinates: ({}, {}, {})",
                bad.lon, bad.lat, bad.elevation
            )));
        }
        if !request.proximity_range_meters.is_finite() || request.proximity_range_meters <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "proximity range must be positive and finite, got {}",
                request.proximity_range_meters
            )));
        }
        validate_clearance(request.min_clearance_meters)?;

        let started = Instant::now();
        let region = GridRegion::PathCorridor {
            path: request.path.iter().map(|p| p.position()).collect(),
            corridor_meters: request.corridor_meters,
        };
        let mut cells = generate_grid(&region, request.cell_size_meters, &self.elevation)?;
        let samples = resample_path(&request.path);

        let mut reporter = ProgressReporter::new(progress);
        path_pass(
            &self.elevation,
            &samples,
            request.proximity_range_meters,
            request.min_clearance_meters,
            &mut cells,
            cancel,
            &mut reporter,
        )?;
        reporter.finish();

        let stats = summarize(&cells, started, None);
        log_completion(AnalysisKind::PathCoverage, &stats);
        Ok(AnalysisResult {
            cells,
            stats,
            station_los: None,
        })
    }

    /// Station-to-station sightline check.
    ///
    /// Produces no grid; the result carries only the
    /// [`StationLosResult`](terralos_model::StationLosResult) and timing.
    pub fn station_link(
        &self,
        request: &StationLinkRequest,
        cancel: &CancelFlag,
        progress: Option<&ProgressSink>,
    ) -> Result<AnalysisResult> {
        let _guard = self.begin(AnalysisKind::StationLink)?;
        check_not_cancelled(cancel)?;
        validate_station(&request.from, "from station")?;
        validate_station(&request.to, "to station")?;

        let started = Instant::now();
        let from = resolve_station_position(&self.elevation, &request.from);
        let to = resolve_station_position(&self.elevation, &request.to);
        let los = station_link_check(&self.elevation, from, to)
            .map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;

        let mut reporter = ProgressReporter::new(progress);
        reporter.finish();

        let stats = summarize(&[], started, None);
        log_completion(AnalysisKind::StationLink, &stats);
        Ok(AnalysisResult {
            cells: Vec::new(),
            stats,
            station_los: Some(los),
        })
    }

    /// Terrain statistics over a region, with no visibility work.
    pub fn terrain_overview(
        &self,
        request: &TerrainOverviewRequest,
        cancel: &CancelFlag,
        progress: Option<&ProgressSink>,
    ) -> Result<AnalysisResult> {
        let _guard = self.begin(AnalysisKind::TerrainOverview)?;
        check_not_cancelled(cancel)?;

        let started = Instant::now();
        let cells = generate_grid(&request.region, request.cell_size_meters, &self.elevation)?;

        let mut reporter = ProgressReporter::new(progress);
        let terrain = terrain_stats_with_progress(&cells, cancel, &mut reporter)?;

        let stats = summarize(&cells, started, Some(terrain));
        log_completion(AnalysisKind::TerrainOverview, &stats);
        Ok(AnalysisResult {
            cells,
            stats,
            station_los: None,
        })
    }

    fn begin(&self, kind: AnalysisKind) -> Result<InFlightGuard<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(kind) {
            return Err(AnalysisError::AlreadyInProgress(kind));
        }
        Ok(InFlightGuard { engine: self, kind })
    }
}

fn check_not_cancelled(cancel: &CancelFlag) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }
    Ok(())
}

fn validate_station(station: &StationConfig, label: &str) -> Result<()> {
    if !station.is_valid() {
        return Err(AnalysisError::InvalidInput(format!(
            "{label} has non-finite coordinates or a non-positive range"
        )));
    }
    Ok(())
}

fn validate_clearance(min_clearance: f64) -> Result<()> {
    if !min_clearance.is_finite() || min_clearance < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "clearance must be non-negative and finite, got {min_clearance}"
        )));
    }
    Ok(())
}

fn summarize(cells: &[GridCell], started: Instant, terrain: Option<TerrainStats>) -> AnalysisStats {
    let total_cells = cells.len();
    let visible_cells = cells.iter().filter(|c| c.fully_visible).count();
    let average_visibility = if total_cells == 0 {
        0.0
    } else {
        cells.iter().map(|c| c.visibility_percent).sum::<f64>() / total_cells as f64
    };
    AnalysisStats {
        total_cells,
        visible_cells,
        average_visibility,
        analysis_time_ms: started.elapsed().as_millis() as u64,
        terrain,
    }
}

fn log_completion(kind: AnalysisKind, stats: &AnalysisStats) {
    info!(
        %kind,
        cells = stats.total_cells,
        visible = stats.visible_cells,
        avg = stats.average_visibility,
        ms = stats.analysis_time_ms,
        "analysis complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use terralos_elevation::ConstantElevation;
    use terralos_model::StationKind;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(Arc::new(ElevationService::new(Arc::new(
            ConstantElevation(0.0),
        ))))
    }

    fn station(lon: f64, lat: f64, range: f64) -> StationConfig {
        StationConfig::new(StationKind::GroundStation, GeoPoint2D::new(lon, lat), 10.0, range)
    }

    #[test]
    fn test_invalid_station_fails_fast() {
        let engine = engine();
        let request = StationCoverageRequest {
            station: station(0.0, 0.0, -5.0),
            cell_size_meters: 100.0,
            min_clearance_meters: 1.0,
            include_terrain_stats: false,
        };
        assert!(matches!(
            engine.station_coverage(&request, &CancelFlag::new(), None),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_merged_needs_two_stations() {
        let engine = engine();
        let request = MergedCoverageRequest {
            stations: vec![station(0.0, 0.0, 1_000.0)],
            cell_size_meters: 100.0,
            min_clearance_meters: 1.0,
        };
        assert!(matches!(
            engine.merged_coverage(&request, &CancelFlag::new(), None),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_degenerate_path_rejected() {
        let engine = engine();
        let request = PathCoverageRequest {
            path: vec![terralos_model::GeoPoint3D::new(0.0, 0.0, 50.0)],
            corridor_meters: 200.0,
            cell_size_meters: 100.0,
            proximity_range_meters: 500.0,
            min_clearance_meters: 1.0,
        };
        assert!(matches!(
            engine.path_coverage(&request, &CancelFlag::new(), None),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_pre_cancelled_run_reports_cancelled() {
        let engine = engine();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let request = StationCoverageRequest {
            station: station(0.0, 0.0, 1_000.0),
            cell_size_meters: 100.0,
            min_clearance_meters: 1.0,
            include_terrain_stats: false,
        };
        assert!(matches!(
            engine.station_coverage(&request, &cancel, None),
            Err(AnalysisError::Cancelled)
        ));
    }

    #[test]
    fn test_in_flight_guard_releases_on_error() {
        let engine = engine();
        let bad = StationCoverageRequest {
            station: station(0.0, 0.0, -1.0),
            cell_size_meters: 100.0,
            min_clearance_meters: 1.0,
            include_terrain_stats: false,
        };
        assert!(engine.station_coverage(&bad, &CancelFlag::new(), None).is_err());

        // The failed run must not leave its kind marked in flight
        let good = StationCoverageRequest {
            station: station(0.0, 0.0, 1_000.0),
            ..bad
        };
        assert!(engine.station_coverage(&good, &CancelFlag::new(), None).is_ok());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AnalysisKind::StationLink.to_string(), "station-link");
        assert_eq!(AnalysisKind::MergedCoverage.to_string(), "merged-coverage");
    }
}
