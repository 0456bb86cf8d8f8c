//! Runs a single-station coverage analysis over synthetic hilly terrain
//! and prints the aggregate statistics.
//!
//! ```sh
//! RUST_LOG=info cargo run --example coverage_map
//! ```

use std::sync::Arc;

use terralos_analysis::{
    AnalysisEngine, CancelFlag, ProgressSink, StationConfig, StationCoverageRequest, StationKind,
};
use terralos_elevation::{ElevationProvider, ElevationService};
use terralos_model::GeoPoint2D;

/// Smooth rolling hills, tallest toward the north-east.
struct RollingHills;

impl ElevationProvider for RollingHills {
    fn elevation(&self, p: GeoPoint2D) -> terralos_elevation::Result<f64> {
        let ridge = (p.lon * 400.0).sin() * (p.lat * 400.0).cos();
        Ok(200.0 + 80.0 * ridge + 1_500.0 * (p.lon + p.lat).max(0.0))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let service = Arc::new(ElevationService::new(Arc::new(RollingHills)));
    let engine = AnalysisEngine::new(service);

    let request = StationCoverageRequest {
        station: StationConfig::new(
            StationKind::GroundStation,
            GeoPoint2D::new(11.35, 46.49),
            15.0,
            3_000.0,
        ),
        cell_size_meters: 100.0,
        min_clearance_meters: 2.0,
        include_terrain_stats: true,
    };

    let progress: ProgressSink = Box::new(|p| println!("progress: {p}%"));
    let result = engine.station_coverage(&request, &CancelFlag::new(), Some(&progress))?;

    println!(
        "{} cells, {} fully visible, average visibility {:.1}% in {} ms",
        result.stats.total_cells,
        result.stats.visible_cells,
        result.stats.average_visibility,
        result.stats.analysis_time_ms,
    );
    if let Some(terrain) = &result.stats.terrain {
        println!(
            "terrain: {:.0}-{:.0} m, mean {:.0} m over {} samples",
            terrain.lowest, terrain.highest, terrain.average, terrain.sampled_elevations,
        );
        for bucket in &terrain.histogram {
            println!("  {:>6.0} m | {}", bucket.lower_bound_m, bucket.count);
        }
    }
    Ok(())
}
