//! # terralos-analysis
//!
//! Visibility aggregation and the analysis orchestrator of the terralos
//! visibility engine.
//!
//! The [`AnalysisEngine`] exposes one entry point per analysis kind:
//!
//! - [`AnalysisEngine::station_coverage`] — per-cell visibility from one
//!   station over its range disc.
//! - [`AnalysisEngine::merged_coverage`] — multi-station merged visibility
//!   with the 0/50/100 observer-count tiering.
//! - [`AnalysisEngine::path_coverage`] — per-cell visibility from a flight
//!   path corridor, as a coverage percentage.
//! - [`AnalysisEngine::station_link`] — a station-to-station sightline
//!   profile check.
//! - [`AnalysisEngine::terrain_overview`] — elevation statistics over a
//!   region with no visibility work.
//!
//! Every run owns a [`CancelFlag`] checked at chunk boundaries; aggregation
//! yields between chunks so the engine never monopolizes its host thread,
//! and coarse progress is reported through an optional [`ProgressSink`].

mod cancel;
mod engine;
mod error;
mod progress;
mod requests;
mod terrain;
mod visibility;

pub use cancel::CancelFlag;
pub use engine::{AnalysisEngine, AnalysisKind};
pub use error::AnalysisError;
pub use progress::ProgressSink;
pub use requests::{
    MergedCoverageRequest, PathCoverageRequest, StationCoverageRequest, StationLinkRequest,
    TerrainOverviewRequest,
};
pub use terrain::{terrain_stats, SUBSAMPLE_THRESHOLD};

// The result data model and region masks pass straight through to hosts.
pub use terralos_grid::GridRegion;
pub use terralos_model::{
    AnalysisResult, AnalysisStats, GridCell, HistogramBucket, StationConfig, StationKind,
    StationLosResult, TerrainStats,
};

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
