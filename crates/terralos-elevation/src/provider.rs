//! The host-supplied elevation provider contract.

use terralos_model::GeoPoint2D;

use crate::Result;

/// A source of terrain elevations, supplied by the host.
///
/// Implementations are typically backed by a DEM tile service. Providers may
/// fail; the [`ElevationService`](crate::ElevationService) owns the fallback
/// chain, so implementations should simply report errors.
pub trait ElevationProvider: Send + Sync {
    /// Elevation in meters at a single coordinate.
    fn elevation(&self, point: GeoPoint2D) -> Result<f64>;

    /// Elevations for a batch of coordinates, same length and order as the
    /// input.
    ///
    /// The default implementation queries point by point; providers with a
    /// native batch interface should override it.
    fn elevation_batch(&self, points: &[GeoPoint2D]) -> Result<Vec<f64>> {
        points.iter().map(|p| self.elevation(*p)).collect()
    }
}

/// A provider returning the same elevation everywhere. Useful for flat-earth
/// tests and as a stand-in before real terrain data is wired up.
#[derive(Debug, Clone, Copy)]
pub struct ConstantElevation(pub f64);

impl ElevationProvider for ConstantElevation {
    fn elevation(&self, _point: GeoPoint2D) -> Result<f64> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_batch_matches_single() {
        let provider = ConstantElevation(55.0);
        let points = vec![GeoPoint2D::new(0.0, 0.0), GeoPoint2D::new(1.0, 1.0)];
        let batch = provider.elevation_batch(&points).unwrap();
        assert_eq!(batch, vec![55.0, 55.0]);
    }
}
