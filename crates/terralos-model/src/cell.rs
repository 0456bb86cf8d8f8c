//! Grid cell representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::GeoPoint2D;

/// One sample cell in an analysis grid.
///
/// Cells are created fresh for each analysis invocation; ids are unique and
/// stable within one run only. The cell's `elevation` is always populated by
/// the grid generator before any visibility is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Identifier, unique within one analysis run.
    pub id: u64,
    /// Closed ring approximating a small circle around the cell center.
    pub boundary: Vec<GeoPoint2D>,
    /// Cell center.
    pub center: GeoPoint2D,
    /// Ground elevation at the cell center, in meters.
    pub elevation: f64,
    /// Visibility of this cell, 0-100.
    pub visibility_percent: f64,
    /// True iff `visibility_percent` is exactly 100 (merged analyses apply
    /// the stricter all-observers predicate instead).
    pub fully_visible: bool,
    /// When visibility was last computed for this cell.
    pub last_analyzed_at: DateTime<Utc>,
    /// Number of observers with clear sight of this cell (merged analyses).
    pub visible_observer_count: Option<u32>,
}

impl GridCell {
    /// Create a cell with no visibility computed yet.
    pub fn new(id: u64, center: GeoPoint2D, boundary: Vec<GeoPoint2D>, elevation: f64) -> Self {
        Self {
            id,
            boundary,
            center,
            elevation,
            visibility_percent: 0.0,
            fully_visible: false,
            last_analyzed_at: Utc::now(),
            visible_observer_count: None,
        }
    }

    /// Record a visibility percentage, keeping the `fully_visible` invariant.
    pub fn set_visibility(&mut self, percent: f64) {
        self.visibility_percent = percent.clamp(0.0, 100.0);
        self.fully_visible = self.visibility_percent == 100.0;
        self.last_analyzed_at = Utc::now();
    }
}
