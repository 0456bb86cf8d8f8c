//! Synthetic elevation services shared by the sightline tests.

use std::sync::Arc;

use terralos_elevation::{ConstantElevation, ElevationProvider, ElevationService};
use terralos_model::{haversine_distance, GeoPoint2D};

/// Flat terrain at a fixed elevation.
pub fn flat_service(elevation: f64) -> ElevationService {
    ElevationService::new(Arc::new(ConstantElevation(elevation)))
}

/// Flat terrain at 0 m with a single cylindrical spike.
struct SpikeProvider {
    center: GeoPoint2D,
    radius_m: f64,
    height: f64,
}

impl ElevationProvider for SpikeProvider {
    fn elevation(&self, point: GeoPoint2D) -> terralos_elevation::Result<f64> {
        if haversine_distance(point, self.center) <= self.radius_m {
            Ok(self.height)
        } else {
            Ok(0.0)
        }
    }
}

/// Elevation service over a [`SpikeProvider`].
pub fn spike_service(center: GeoPoint2D, radius_m: f64, height: f64) -> ElevationService {
    ElevationService::new(Arc::new(SpikeProvider {
        center,
        radius_m,
        height,
    }))
}
