//! Great-circle distance.

use crate::models::Coordinate;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates, in metres.
///
/// # Examples
///
/// ```
/// use delivery_routes::geo::haversine;
/// use delivery_routes::models::Coordinate;
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
/// let d = haversine(a, b);
/// assert!((d - 111_195.0).abs() < 1.0);
/// ```
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let c = Coordinate::new(51.0447, -114.0719);
        assert_eq!(haversine(c, c), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = Coordinate::new(51.1196913, -114.0316978);
        let b = Coordinate::new(51.0447, -114.0719);
        assert!((haversine(a, b) - haversine(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_warehouse_to_downtown() {
        // Airport-area warehouse to downtown Calgary is roughly 8.8 km.
        let a = Coordinate::new(51.1196913, -114.0316978);
        let b = Coordinate::new(51.0447, -114.0719);
        let d = haversine(a, b);
        assert!(d > 8_500.0 && d < 9_100.0, "got {d}");
    }

    #[test]
    fn test_antipodal_is_finite() {
        let d = haversine(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1.0);
    }
}
