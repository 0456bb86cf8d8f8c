//! Per-kind analysis request types.
//!
//! Each analysis kind has its own request struct carrying exactly the
//! fields that kind requires; there is no shared options bag.

use serde::{Deserialize, Serialize};
use terralos_grid::GridRegion;
use terralos_model::{GeoPoint3D, StationConfig};

/// Single-station coverage over the station's range disc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCoverageRequest {
    /// The observing station.
    pub station: StationConfig,
    /// Grid cell spacing in meters.
    pub cell_size_meters: f64,
    /// Required vertical clearance above terrain at each observed cell,
    /// meters.
    pub min_clearance_meters: f64,
    /// Also compute terrain statistics over the grid.
    pub include_terrain_stats: bool,
}

/// Merged coverage from several stations over the union of their ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedCoverageRequest {
    /// Participating stations, at least two.
    pub stations: Vec<StationConfig>,
    /// Grid cell spacing in meters.
    pub cell_size_meters: f64,
    /// Required vertical clearance above terrain at each observed cell,
    /// meters.
    pub min_clearance_meters: f64,
}

/// Coverage of the terrain corridor around a flight path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCoverageRequest {
    /// Flight path vertices with altitudes, at least two.
    pub path: Vec<GeoPoint3D>,
    /// Corridor half-width around the path, meters.
    pub corridor_meters: f64,
    /// Grid cell spacing in meters.
    pub cell_size_meters: f64,
    /// Only flight-path samples within this range of a cell count toward
    /// its coverage, meters.
    pub proximity_range_meters: f64,
    /// Required vertical clearance above terrain at each observed cell,
    /// meters.
    pub min_clearance_meters: f64,
}

/// Station-to-station sightline check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLinkRequest {
    /// Source station.
    pub from: StationConfig,
    /// Target station.
    pub to: StationConfig,
}

/// Terrain statistics over a region, with no visibility work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainOverviewRequest {
    /// The region to sample.
    pub region: GridRegion,
    /// Grid cell spacing in meters.
    pub cell_size_meters: f64,
}
