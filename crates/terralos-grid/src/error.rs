//! Error types for grid generation.

use terralos_model::BoundingBox;
use thiserror::Error;

/// Errors that can occur when building an analysis grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// The region description itself is malformed (non-positive range,
    /// degenerate path, too few stations, bad cell size).
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// The derived bounding box falls outside the valid longitude/latitude
    /// domain.
    #[error("bounding box out of valid lat/lon domain: lon {min_lon}..{max_lon}, lat {min_lat}..{max_lat}")]
    Bounds {
        /// West edge of the rejected box.
        min_lon: f64,
        /// South edge of the rejected box.
        min_lat: f64,
        /// East edge of the rejected box.
        max_lon: f64,
        /// North edge of the rejected box.
        max_lat: f64,
    },

    /// Masking left no cells in the grid.
    #[error("grid generation produced no cells")]
    EmptyGrid,
}

impl GridError {
    /// Build a `Bounds` error from the rejected box.
    pub(crate) fn bounds(bbox: &BoundingBox) -> Self {
        GridError::Bounds {
            min_lon: bbox.min_lon,
            min_lat: bbox.min_lat,
            max_lon: bbox.max_lon,
            max_lat: bbox.max_lat,
        }
    }
}
