//! Geodesic math on WGS84 coordinates.
//!
//! Provides great-circle distance (haversine), initial bearing and the
//! planar interpolation used to move a marker along a segment.

mod types;

pub use types::{CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// Symmetric, and zero when `a == b`.
#[inline]
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat_rad();
    let phi2 = b.lat_rad();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Initial great-circle bearing from `a` towards `b`.
///
/// Returns degrees in `[0, 360)`, where 0 = North, 90 = East. The direction
/// is meaningless when `a == b`; callers skip zero-length segments first.
#[inline]
pub fn bearing_degrees(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat_rad();
    let phi2 = b.lat_rad();
    let d_lambda = b.lon_rad() - a.lon_rad();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Linear interpolation between two coordinates.
///
/// Latitude and longitude are interpolated independently. This is not a
/// geodesic slerp; it is accurate enough for street-scale segments.
/// `t = 1.0` returns `b` exactly.
#[inline]
pub fn lerp(a: &Coordinate, b: &Coordinate, t: f64) -> Coordinate {
    if t >= 1.0 {
        return *b;
    }
    Coordinate::new_unchecked(
        a.latitude + (b.latitude - a.latitude) * t,
        a.longitude + (b.longitude - a.longitude) * t,
    )
}

/// Fold an `atan2` result in `[-180, 180]` into `[0, 360)`.
#[inline]
fn normalize_degrees(deg: f64) -> f64 {
    (deg + 360.0) % 360.0
}
