//! Error types for the elevation access layer.

use thiserror::Error;

/// Errors a host elevation provider can report.
///
/// These never reach the engine's top-level callers; the
/// [`ElevationService`](crate::ElevationService) resolves every failure to a
/// best-effort default internally.
#[derive(Debug, Error)]
pub enum ElevationError {
    /// The underlying provider failed to answer a query.
    #[error("elevation provider error: {0}")]
    Provider(String),

    /// A batch query returned a different number of values than requested.
    #[error("batch length mismatch: requested {requested}, got {returned}")]
    BatchLengthMismatch {
        /// Number of points requested.
        requested: usize,
        /// Number of values returned.
        returned: usize,
    },

    /// The provider has no data covering the coordinate.
    #[error("no elevation data at ({lat}, {lon})")]
    NoData {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
    },
}
