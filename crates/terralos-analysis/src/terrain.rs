//! Terrain statistics over a cell set.

use std::collections::BTreeMap;

use terralos_model::{GridCell, HistogramBucket, TerrainStats};
use tracing::debug;

use crate::progress::ProgressReporter;
use crate::visibility::CHUNK_SIZE;
use crate::{AnalysisError, CancelFlag, Result};

/// Cell sets larger than this have their mean and histogram computed over a
/// deterministic evenly-spaced subsample of at most this many cells.
/// `highest`/`lowest` are always exact over the full set.
pub const SUBSAMPLE_THRESHOLD: usize = 10_000;

/// Histogram bucket width in meters.
const BUCKET_WIDTH_M: f64 = 10.0;

/// Compute elevation statistics over a cell set.
///
/// `highest` and `lowest` are exact minima/maxima of the full set. For sets
/// above [`SUBSAMPLE_THRESHOLD`] cells, `average` and the 10 m-bucket
/// histogram are computed over every k-th cell with k chosen to keep the
/// subsample at or under the threshold — a deliberate accuracy/cost
/// trade-off for very large areas, reflected in
/// [`TerrainStats::sampled_elevations`].
///
/// Processing is chunked; the cancel flag is checked between chunks.
pub fn terrain_stats(cells: &[GridCell], cancel: &CancelFlag) -> Result<TerrainStats> {
    if cells.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "terrain statistics need at least one cell".into(),
        ));
    }
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }

    // Exact min/max over everything; cheap even for very large sets.
    let mut highest = f64::NEG_INFINITY;
    let mut lowest = f64::INFINITY;
    for chunk in cells.chunks(CHUNK_SIZE) {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        for cell in chunk {
            highest = highest.max(cell.elevation);
            lowest = lowest.min(cell.elevation);
        }
        std::thread::yield_now();
    }

    // Deterministic every-k-th subsample for mean and histogram.
    let stride = cells.len().div_ceil(SUBSAMPLE_THRESHOLD).max(1);
    if stride > 1 {
        debug!(
            cells = cells.len(),
            stride, "subsampling terrain statistics for a large cell set"
        );
    }

    let mut sum = 0.0;
    let mut sampled = 0usize;
    let mut buckets: BTreeMap<i64, usize> = BTreeMap::new();
    let subsample: Vec<f64> = cells
        .iter()
        .step_by(stride)
        .map(|c| c.elevation)
        .collect();
    for chunk in subsample.chunks(CHUNK_SIZE) {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        for &elevation in chunk {
            sum += elevation;
            sampled += 1;
            let bucket = (elevation / BUCKET_WIDTH_M).floor() as i64;
            *buckets.entry(bucket).or_insert(0) += 1;
        }
        std::thread::yield_now();
    }

    let histogram = buckets
        .into_iter()
        .map(|(bucket, count)| HistogramBucket {
            lower_bound_m: bucket as f64 * BUCKET_WIDTH_M,
            count,
        })
        .collect();

    Ok(TerrainStats {
        highest,
        lowest,
        average: sum / sampled as f64,
        histogram,
        sampled_elevations: sampled,
    })
}

/// Chunked, cancellable wrapper used by the orchestrator so terrain-only
/// runs report progress like the visibility passes do.
pub(crate) fn terrain_stats_with_progress(
    cells: &[GridCell],
    cancel: &CancelFlag,
    progress: &mut ProgressReporter<'_>,
) -> Result<TerrainStats> {
    let stats = terrain_stats(cells, cancel)?;
    progress.finish();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terralos_model::GeoPoint2D;

    fn cells_with_elevations(elevations: impl IntoIterator<Item = f64>) -> Vec<GridCell> {
        elevations
            .into_iter()
            .enumerate()
            .map(|(i, e)| GridCell::new(i as u64, GeoPoint2D::new(0.0, 0.0), vec![], e))
            .collect()
    }

    #[test]
    fn test_small_set_is_exact() {
        let cells = cells_with_elevations([5.0, 25.0, 15.0, -3.0]);
        let stats = terrain_stats(&cells, &CancelFlag::new()).unwrap();
        assert_eq!(stats.highest, 25.0);
        assert_eq!(stats.lowest, -3.0);
        assert_eq!(stats.average, 10.5);
        assert_eq!(stats.sampled_elevations, 4);
    }

    #[test]
    fn test_histogram_buckets() {
        let cells = cells_with_elevations([0.0, 4.0, 9.9, 10.0, 19.9, 20.0, -0.1]);
        let stats = terrain_stats(&cells, &CancelFlag::new()).unwrap();
        let counts: Vec<(f64, usize)> = stats
            .histogram
            .iter()
            .map(|b| (b.lower_bound_m, b.count))
            .collect();
        assert_eq!(counts, vec![(-10.0, 1), (0.0, 3), (10.0, 2), (20.0, 1)]);
        let total: usize = stats.histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, stats.sampled_elevations);
    }

    #[test]
    fn test_large_set_subsamples_mean_but_not_extremes() {
        // 15,000 cells over a 10,000 threshold: min/max exact, mean over a
        // <= 10,000 cell deterministic subsample
        let n: usize = 15_000;
        let cells = cells_with_elevations((0..n).map(|i| i as f64));
        let stats = terrain_stats(&cells, &CancelFlag::new()).unwrap();

        assert_eq!(stats.highest, (n - 1) as f64);
        assert_eq!(stats.lowest, 0.0);
        assert!(stats.sampled_elevations <= SUBSAMPLE_THRESHOLD);
        assert_eq!(stats.sampled_elevations, n.div_ceil(2));

        // Uniform ramp: subsampled mean stays close to the true mean
        let true_mean = (n - 1) as f64 / 2.0;
        assert!((stats.average - true_mean).abs() / true_mean < 0.01);
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(
            terrain_stats(&[], &CancelFlag::new()),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let cells = cells_with_elevations([1.0, 2.0]);
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert!(matches!(
            terrain_stats(&cells, &cancel),
            Err(AnalysisError::Cancelled)
        ));
    }
}
