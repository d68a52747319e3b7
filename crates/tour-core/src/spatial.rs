//! Distance math for candidate selection.
//!
//! Straight-line distance only. Road distance comes from the router.

use crate::models::GeoPoint;

/// WGS84 semi-major axis (m).
const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
/// WGS84 semi-minor axis (m).
const SEMI_MINOR_AXIS_M: f64 = 6_356_752.314245;

/// Distance between two points in kilometres (Hubeny formula).
///
/// Accurate for separations of tens to a few hundred km. Error grows at
/// continental scale and near the poles.
pub fn hubeny_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let a2 = SEMI_MAJOR_AXIS_M * SEMI_MAJOR_AXIS_M;
    let e2 = (a2 - SEMI_MINOR_AXIS_M * SEMI_MINOR_AXIS_M) / a2;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = phi1 - phi2;
    let dlambda = lon1.to_radians() - lon2.to_radians();
    let mean_phi = (phi1 + phi2) / 2.0;

    let sin_mean = mean_phi.sin();
    let w = (1.0 - e2 * sin_mean * sin_mean).sqrt();
    // Meridian and prime-vertical radii of curvature.
    let m = SEMI_MAJOR_AXIS_M * (1.0 - e2) / (w * w * w);
    let n = SEMI_MAJOR_AXIS_M / w;

    let dy = dphi * m;
    let dx = dlambda * n * mean_phi.cos();
    (dy * dy + dx * dx).sqrt() / 1000.0
}

/// [`hubeny_distance_km`] over two [`GeoPoint`]s.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    hubeny_distance_km(a.lat(), a.lon(), b.lat(), b.lon())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_for_same_point() {
        let p = GeoPoint::new(34.710809, 137.726307);
        assert_eq!(distance_km(&p, &p), 0.0);
    }

    #[test]
    fn symmetric() {
        let tokyo = GeoPoint::new(35.681236, 139.767125);
        let hamamatsu = GeoPoint::new(34.710809, 137.726307);
        let ab = distance_km(&tokyo, &hamamatsu);
        let ba = distance_km(&hamamatsu, &tokyo);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn hamamatsu_wards_fixture() {
        // Chuo-ku to Hamana-ku
        let dist = hubeny_distance_km(34.710809, 137.726307, 34.791548, 137.783159);
        let expected = 10.3597;
        assert!(((dist - expected) / expected).abs() < 1e-3, "got {}", dist);
    }

    #[test]
    fn one_degree_of_latitude_near_equator() {
        let dist = hubeny_distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 110.57).abs() < 0.5, "got {}", dist);
    }
}
