//! Great-circle distance and coordinate keys.

use lens_core::defaults::{CACHE_COORD_PRECISION, EARTH_RADIUS_M};
use lens_core::Coordinates;

/// Haversine distance in meters on a spherical earth.
pub fn haversine_m(from: Coordinates, to: Coordinates) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = (to.lat - from.lat).to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Whole-meter distance as reported on candidates.
pub fn distance_m(from: Coordinates, to: Coordinates) -> u32 {
    let d = haversine_m(from, to);
    if d.is_finite() {
        d.min(u32::MAX as f64) as u32
    } else {
        u32::MAX
    }
}

/// Coordinates rounded for cache keys, so requests a few meters apart
/// share an entry.
pub fn coord_key(at: Coordinates) -> String {
    format!(
        "{:.prec$}:{:.prec$}",
        at.lat,
        at.lng,
        prec = CACHE_COORD_PRECISION
    )
}
