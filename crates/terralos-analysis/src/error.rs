//! Error types for analysis orchestration.

use terralos_grid::GridError;
use thiserror::Error;

use crate::AnalysisKind;

/// Errors that can occur when running an analysis.
///
/// `InvalidInput` and `Grid` are returned before any sampling work begins.
/// Per-cell failures during aggregation are logged and the cell skipped;
/// they never surface here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed request: bad coordinates, non-positive ranges, degenerate
    /// paths, or too few stations.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The grid generator rejected the region.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Cooperative cancellation was observed; no partial result is
    /// returned.
    #[error("analysis cancelled")]
    Cancelled,

    /// An analysis of this kind is already running in this session.
    #[error("a {0} analysis is already in progress")]
    AlreadyInProgress(AnalysisKind),
}
