//! Spherical-Earth geodesy on top of `geo`'s haversine metric space.

use crate::models::Coordinates;
use geo::{Destination, Distance, Haversine};

/// Point reached by travelling `distance_km` from `origin` along
/// `bearing_degrees` (clockwise from true north).
pub fn destination_point(origin: &Coordinates, distance_km: f64, bearing_degrees: f64) -> Coordinates {
    let bearing = bearing_degrees.rem_euclid(360.0);
    let point = Haversine.destination(origin.to_point(), bearing, distance_km * 1000.0);
    let destination = Coordinates::from_point(point);

    Coordinates {
        lat: destination.lat.clamp(-90.0, 90.0),
        lon: normalize_longitude(destination.lon),
    }
}

/// Great-circle distance in kilometers.
pub fn haversine_distance_km(a: &Coordinates, b: &Coordinates) -> f64 {
    if a == b {
        return 0.0;
    }
    Haversine.distance(a.to_point(), b.to_point()).max(0.0) / 1000.0
}

fn normalize_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
