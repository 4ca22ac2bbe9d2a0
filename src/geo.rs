//! Great-circle distance between coordinates

use crate::core::location::LatLng;
pub use crate::core::validation::filters::round_decimals;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Decimal places kept by [`distance`]
pub const DISTANCE_DECIMALS: u32 = 2;

/// Haversine distance in kilometers, rounded to [`DISTANCE_DECIMALS`].
///
/// Coordinates are not range-checked; that is the caller's responsibility.
pub fn distance(a: LatLng, b: LatLng) -> f64 {
    round_decimals(distance_precise(a, b), DISTANCE_DECIMALS)
}

/// Haversine distance in kilometers, unrounded
#[inline]
pub fn distance_precise(a: LatLng, b: LatLng) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = distance(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_same_point_is_zero() {
        for p in [
            LatLng::new(0.0, 0.0),
            LatLng::new(32.0853, 34.7818),
            LatLng::new(-89.9, 179.9),
        ] {
            assert_eq!(distance(p, p), 0.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let tlv = LatLng::new(32.0853, 34.7818);
        let jlm = LatLng::new(31.7683, 35.2137);
        assert_eq!(distance(tlv, jlm), distance(jlm, tlv));
    }

    #[test]
    fn test_london_paris() {
        let d = distance(LatLng::new(51.5074, -0.1278), LatLng::new(48.8566, 2.3522));
        assert!((d - 343.5).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_result_has_two_decimals() {
        let d = distance(LatLng::new(10.0, 10.0), LatLng::new(10.123, 10.456));
        assert_eq!(d, round_decimals(d, 2));
        assert!((d - distance_precise(LatLng::new(10.0, 10.0), LatLng::new(10.123, 10.456))).abs() <= 0.005);
    }

    #[test]
    fn test_antipodes() {
        let d = distance_precise(LatLng::new(0.0, 0.0), LatLng::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
