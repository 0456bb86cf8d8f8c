//! # terralos-elevation
//!
//! Elevation access layer for the terralos visibility engine.
//!
//! The engine never reads terrain data itself; the host supplies an
//! [`ElevationProvider`] (for example backed by a DEM tile service) and the
//! [`ElevationService`] wraps it behind a uniform point/batch interface with
//! a bounded in-memory cache.
//!
//! Queries through the service are fail-soft: a provider failure is retried
//! once, then logged and resolved to a default elevation of `0.0` rather
//! than propagated. Callers therefore always get a best-effort value.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use terralos_elevation::{ConstantElevation, ElevationService};
//! use terralos_model::GeoPoint2D;
//!
//! let service = ElevationService::new(Arc::new(ConstantElevation(120.0)));
//! let elevation = service.elevation_at(GeoPoint2D::new(-122.33, 47.61));
//! assert_eq!(elevation, 120.0);
//! ```

mod error;
mod provider;
mod service;

pub use error::ElevationError;
pub use provider::{ConstantElevation, ElevationProvider};
pub use service::{ElevationService, DEFAULT_BATCH_WIDTH, DEFAULT_CACHE_CAPACITY};

/// Result type for elevation provider operations.
pub type Result<T> = std::result::Result<T, ElevationError>;
