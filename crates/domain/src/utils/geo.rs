//! Great-circle distance between coordinates
//!
//! Haversine over a spherical Earth of mean radius
//! [`EARTH_RADIUS_METERS`]. Inputs are decimal degrees.

use crate::constants::EARTH_RADIUS_METERS;

/// Distance in meters between `(lat_a, lng_a)` and `(lat_b, lng_b)`.
///
/// Symmetric in its two points and zero for identical points. Longitudes on
/// either side of the antimeridian are handled by the formula itself.
pub fn distance_meters(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> f64 {
    let lat_a_rad = lat_a.to_radians();
    let lat_b_rad = lat_b.to_radians();
    let lat_diff = (lat_b - lat_a).to_radians();
    let lng_diff = (lng_b - lng_a).to_radians();

    let a = (lat_diff / 2.0).sin().powi(2)
        + lat_a_rad.cos() * lat_b_rad.cos() * (lng_diff / 2.0).sin().powi(2);

    // Rounding can push `a` a hair outside [0, 1] for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_METERS: f64 = 1e-6;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(distance_meters(40.0, -75.0, 40.0, -75.0), 0.0);
        assert_eq!(distance_meters(-33.8688, 151.2093, -33.8688, 151.2093), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            ((40.0, -75.0), (40.0045, -75.0)),
            ((51.5074, -0.1278), (48.8566, 2.3522)),
            ((-33.8688, 151.2093), (35.6762, 139.6503)),
            ((89.9, 0.0), (-89.9, 180.0)),
        ];

        for ((lat_a, lng_a), (lat_b, lng_b)) in pairs {
            let forward = distance_meters(lat_a, lng_a, lat_b, lng_b);
            let backward = distance_meters(lat_b, lng_b, lat_a, lng_a);
            assert!((forward - backward).abs() < TOLERANCE_METERS);
            assert!(forward >= 0.0);
        }
    }

    #[test]
    fn london_to_paris_is_about_344_km() {
        let meters = distance_meters(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((meters - 343_560.0).abs() < 1_000.0, "got {meters}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let meters = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((meters - 111_195.0).abs() < 1.0, "got {meters}");
    }

    #[test]
    fn short_hop_across_antimeridian() {
        // 0.2 degrees of longitude at the equator, not 359.8.
        let meters = distance_meters(0.0, 179.9, 0.0, -179.9);
        assert!((meters - 22_239.0).abs() < 5.0, "got {meters}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let meters = distance_meters(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((meters - half).abs() < 1.0);
    }
}
