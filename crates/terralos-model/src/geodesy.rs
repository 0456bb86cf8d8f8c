//! Distance and interpolation helpers on WGS84 coordinates.
//!
//! The engine works over areas a few tens of kilometers across, so an
//! equirectangular approximation is used for local metric math
//! (point-to-segment distances, lattice spacing) while the haversine
//! formula is used for absolute distances.

use crate::GeoPoint2D;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Approximate length of one degree of latitude in meters.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Approximate length of one degree of longitude in meters at a latitude.
pub fn meters_per_degree_lon(lat: f64) -> f64 {
    METERS_PER_DEGREE_LAT * lat.to_radians().cos()
}

/// Calculate the distance between two points using the haversine formula.
///
/// Returns the distance in meters.
pub fn haversine_distance(a: GeoPoint2D, b: GeoPoint2D) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Linearly interpolate between two points at fraction `t` in [0, 1].
pub fn interpolate(a: GeoPoint2D, b: GeoPoint2D, t: f64) -> GeoPoint2D {
    GeoPoint2D {
        lon: a.lon + t * (b.lon - a.lon),
        lat: a.lat + t * (b.lat - a.lat),
    }
}

/// Distance in meters from a point to the segment `a`-`b`.
///
/// Uses a local equirectangular projection centered on the query point,
/// which is accurate for the corridor widths this engine deals with
/// (hundreds of meters to a few kilometers).
pub fn point_segment_distance(p: GeoPoint2D, a: GeoPoint2D, b: GeoPoint2D) -> f64 {
    let mx = meters_per_degree_lon(p.lat);
    let my = METERS_PER_DEGREE_LAT;

    let ax = (a.lon - p.lon) * mx;
    let ay = (a.lat - p.lat) * my;
    let bx = (b.lon - p.lon) * mx;
    let by = (b.lat - p.lat) * my;

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    // Degenerate segment collapses to a point
    if len_sq == 0.0 {
        return (ax * ax + ay * ay).sqrt();
    }

    let t = (-(ax * dx + ay * dy) / len_sq).clamp(0.0, 1.0);
    let cx = ax + t * dx;
    let cy = ay + t * dy;
    (cx * cx + cy * cy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_seattle_portland() {
        // Seattle to Portland is approximately 233 km
        let seattle = GeoPoint2D::new(-122.3321, 47.6062);
        let portland = GeoPoint2D::new(-122.6784, 45.5152);
        let dist = haversine_distance(seattle, portland);
        assert!((dist - 233_000.0).abs() < 5_000.0);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let p = GeoPoint2D::new(10.0, 50.0);
        assert_relative_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_one_hundredth_degree_at_equator() {
        // 0.01 degrees of longitude at the equator is ~1.11 km
        let a = GeoPoint2D::new(0.0, 0.0);
        let b = GeoPoint2D::new(0.01, 0.0);
        let dist = haversine_distance(a, b);
        assert!((dist - 1_113.0).abs() < 10.0);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = GeoPoint2D::new(0.0, 0.0);
        let b = GeoPoint2D::new(2.0, 4.0);
        let mid = interpolate(a, b, 0.5);
        assert_relative_eq!(mid.lon, 1.0);
        assert_relative_eq!(mid.lat, 2.0);
    }

    #[test]
    fn test_point_segment_distance_perpendicular() {
        // Point 0.01 deg north of an east-west segment at the equator
        let p = GeoPoint2D::new(0.005, 0.01);
        let a = GeoPoint2D::new(0.0, 0.0);
        let b = GeoPoint2D::new(0.01, 0.0);
        let dist = point_segment_distance(p, a, b);
        assert!((dist - 0.01 * METERS_PER_DEGREE_LAT).abs() < 5.0);
    }

    #[test]
    fn test_point_segment_distance_beyond_endpoint() {
        // Point east of the segment end clamps to the endpoint distance
        let p = GeoPoint2D::new(0.02, 0.0);
        let a = GeoPoint2D::new(0.0, 0.0);
        let b = GeoPoint2D::new(0.01, 0.0);
        let dist = point_segment_distance(p, a, b);
        let direct = haversine_distance(p, b);
        assert!((dist - direct).abs() < 5.0);
    }

    #[test]
    fn test_point_segment_distance_degenerate() {
        let p = GeoPoint2D::new(0.0, 0.01);
        let a = GeoPoint2D::new(0.0, 0.0);
        let dist = point_segment_distance(p, a, a);
        assert!((dist - 0.01 * METERS_PER_DEGREE_LAT).abs() < 5.0);
    }
}
