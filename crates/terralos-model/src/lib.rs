//! # terralos-model
//!
//! Shared geodesy primitives and result data model for the terralos
//! visibility engine.
//!
//! This crate defines the coordinate types, bounding boxes, and distance
//! helpers used by every other engine crate, plus the analysis-facing data
//! model: grid cells, station configurations, line-of-sight profiles, and
//! aggregate statistics.
//!
//! All coordinates are WGS84 decimal degrees; all distances and elevations
//! are meters.

mod bounds;
mod cell;
mod geodesy;
mod point;
mod profile;
mod station;
mod stats;

pub use bounds::BoundingBox;
pub use cell::GridCell;
pub use geodesy::{
    haversine_distance, interpolate, meters_per_degree_lon, point_segment_distance,
    EARTH_RADIUS_M, METERS_PER_DEGREE_LAT,
};
pub use point::{GeoPoint2D, GeoPoint3D};
pub use profile::{LosProfilePoint, StationLosResult};
pub use station::{StationConfig, StationKind};
pub use stats::{AnalysisResult, AnalysisStats, HistogramBucket, TerrainStats};
