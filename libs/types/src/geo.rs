//! Geographic helpers: great-circle distance, derived speed and random
//! coordinates for simulated vehicles.

use crate::position::PositionRecord;
use rand::Rng;
use std::f64::consts::PI;

const RAD: f64 = PI / 180.0;

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Meters per degree of latitude, used to scale random walk steps
const METERS_PER_DEGREE: f64 = 111_300.0;

const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;

/// Haversine distance in km between two `lat, lon` coordinates given in degrees.
pub fn distance(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> f64 {
    let dlat = (lat1 - lat0) * RAD;
    let dlon = (lon1 - lon0) * RAD;
    let lat0 = lat0 * RAD;
    let lat1 = lat1 * RAD;
    let a = 0.5 - dlat.cos() / 2.0 + lat0.cos() * lat1.cos() * (1.0 - dlon.cos()) / 2.0;
    // rounding may leave `a` just outside [0, 1] for antipodal points
    2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Speed in km/h needed to travel from `from` to `to`.
///
/// Identical coordinates always yield exactly zero, whatever the elapsed time.
/// A non-zero distance covered in no time has no meaningful speed and also
/// yields zero.
pub fn speed_kmh(from: &PositionRecord, to: &PositionRecord) -> f64 {
    if from.same_coordinates(to) {
        return 0.0;
    }
    let d = distance(from.lat, from.lon, to.lat, to.lon);
    if d == 0.0 {
        return 0.0;
    }
    let hours = match (to.timestamp - from.timestamp).num_nanoseconds() {
        Some(nanos) if nanos > 0 => nanos as f64 / NANOS_PER_HOUR,
        _ => return 0.0,
    };
    d / hours
}

/// Random coordinate anywhere on the globe
pub fn random_lat_lon<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let lat = rng.gen::<f64>() * 180.0 - 90.0;
    let lon = rng.gen::<f64>() * 360.0 - 180.0;
    (lat, lon)
}

/// Random coordinate within `meters` of `lat0, lon0`
///
/// Uniform over the disc, see
/// https://gis.stackexchange.com/questions/25877/generating-random-locations-nearby
pub fn random_lat_lon_nearby<R: Rng + ?Sized>(
    rng: &mut R,
    lat0: f64,
    lon0: f64,
    meters: f64,
) -> (f64, f64) {
    let r = meters / METERS_PER_DEGREE;
    let w = r * rng.gen::<f64>().sqrt();
    let t = 2.0 * PI * rng.gen::<f64>();
    let x = w * t.cos();
    let y = w * t.sin();
    (lat0 + y, lon0 + x / (lat0 * RAD).cos())
}
