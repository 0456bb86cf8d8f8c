//! # terralos-grid
//!
//! Region masks and sample-grid generation for the terralos visibility
//! engine.
//!
//! A [`GridRegion`] describes one of three spatial masks: a disc around a
//! point, a corridor around a polyline, or the union of several station
//! ranges. [`generate_grid`] materializes the mask as a regular lattice of
//! [`GridCell`](terralos_model::GridCell)s with elevations resolved through
//! the elevation access layer in one batched call.

mod error;
mod generate;
mod region;

pub use error::GridError;
pub use generate::generate_grid;
pub use region::GridRegion;

/// Result type for grid generation.
pub type Result<T> = std::result::Result<T, GridError>;
