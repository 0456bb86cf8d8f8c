//! Lattice generation over a region mask.

use terralos_elevation::ElevationService;
use terralos_model::{
    meters_per_degree_lon, GeoPoint2D, GridCell, METERS_PER_DEGREE_LAT,
};
use tracing::debug;

use crate::{GridError, GridRegion, Result};

/// Number of sides in a cell's boundary ring. A hexagon is a coarse but
/// sufficient circle approximation for rendering and area bookkeeping.
const BOUNDARY_SIDES: usize = 6;

/// Generate the sample grid for a region.
///
/// Lattice points are spaced `cell_size_meters` apart over the region's
/// bounding box and clipped to the region mask. Each surviving point becomes
/// a [`GridCell`] whose boundary approximates a circle of radius
/// `cell_size_meters / 2`, with its elevation resolved through a single
/// batched call to the elevation access layer.
///
/// Fails fast with [`GridError`] before any elevation work if the region or
/// cell size is invalid, the bounding box leaves the valid lat/lon domain,
/// or masking leaves no cells.
pub fn generate_grid(
    region: &GridRegion,
    cell_size_meters: f64,
    elevation: &ElevationService,
) -> Result<Vec<GridCell>> {
    region.validate()?;
    if !cell_size_meters.is_finite() || cell_size_meters <= 0.0 {
        return Err(GridError::InvalidRegion(format!(
            "cell size must be positive and finite, got {cell_size_meters}"
        )));
    }

    let bbox = region.bounding_box()?;
    let center_lat = bbox.center().lat;

    let lat_step = cell_size_meters / METERS_PER_DEGREE_LAT;
    let lon_step = cell_size_meters / meters_per_degree_lon(center_lat).max(1.0);

    // Lattice points at cell-size spacing, offset by half a step so cells
    // sit inside the box rather than on its edge.
    let mut centers: Vec<GeoPoint2D> = Vec::new();
    let mut lat = bbox.min_lat + lat_step / 2.0;
    while lat < bbox.max_lat {
        let mut lon = bbox.min_lon + lon_step / 2.0;
        while lon < bbox.max_lon {
            let p = GeoPoint2D::new(lon, lat);
            if region.contains(p) {
                centers.push(p);
            }
            lon += lon_step;
        }
        lat += lat_step;
    }

    if centers.is_empty() {
        return Err(GridError::EmptyGrid);
    }
    debug!(cells = centers.len(), cell_size_meters, "generated grid lattice");

    // One batched elevation call for the whole grid; the service chunks it.
    let elevations = elevation.elevation_batch_at(&centers);

    let radius = cell_size_meters / 2.0;
    let cells = centers
        .into_iter()
        .zip(elevations)
        .enumerate()
        .map(|(id, (center, elev))| {
            GridCell::new(id as u64, center, cell_boundary(center, radius), elev)
        })
        .collect();

    Ok(cells)
}

/// Closed hexagonal ring of `radius` meters around a center point.
fn cell_boundary(center: GeoPoint2D, radius: f64) -> Vec<GeoPoint2D> {
    let lon_scale = meters_per_degree_lon(center.lat).max(1.0);
    let mut ring: Vec<GeoPoint2D> = (0..BOUNDARY_SIDES)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / BOUNDARY_SIDES as f64;
            GeoPoint2D::new(
                center.lon + radius * angle.cos() / lon_scale,
                center.lat + radius * angle.sin() / METERS_PER_DEGREE_LAT,
            )
        })
        .collect();
    // Close the ring
    ring.push(ring[0]);
    ring
}
