//! Aggregate analysis statistics.

use serde::{Deserialize, Serialize};

use crate::{GridCell, StationLosResult};

/// One histogram bucket of elevations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Inclusive lower bound of the bucket, in meters.
    pub lower_bound_m: f64,
    /// Number of sampled elevations in the bucket.
    pub count: usize,
}

/// Terrain elevation statistics over a cell set.
///
/// For very large cell sets `highest`/`lowest` are always exact over the
/// full set, while `average` and `histogram` may be computed over a
/// deterministic evenly-spaced subsample (see `sampled_elevations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainStats {
    /// Highest elevation in the full set, meters.
    pub highest: f64,
    /// Lowest elevation in the full set, meters.
    pub lowest: f64,
    /// Mean elevation of the sampled subset, meters.
    pub average: f64,
    /// Elevation histogram of the sampled subset, ascending bucket order.
    pub histogram: Vec<HistogramBucket>,
    /// Number of elevations behind `average` and `histogram`.
    pub sampled_elevations: usize,
}

/// Summary statistics for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Total number of cells in the grid.
    pub total_cells: usize,
    /// Number of cells with full visibility.
    pub visible_cells: usize,
    /// Mean of all cell visibility percentages, 0-100.
    pub average_visibility: f64,
    /// Wall-clock duration of the run, in milliseconds.
    pub analysis_time_ms: u64,
    /// Terrain statistics, when the analysis computed them.
    pub terrain: Option<TerrainStats>,
}

/// Full result of one analysis invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The analyzed cell set.
    pub cells: Vec<GridCell>,
    /// Aggregate statistics.
    pub stats: AnalysisStats,
    /// Station-to-station sightline outcome, for link analyses.
    pub station_los: Option<StationLosResult>,
}
