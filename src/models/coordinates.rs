use crate::services::geodesy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lon
            ));
        }
        Ok(Coordinates { lat, lon })
    }

    /// Great-circle distance to `other` in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        geodesy::haversine_distance_km(self, other)
    }

    pub(crate) fn to_point(self) -> ::geo::Point<f64> {
        ::geo::Point::new(self.lon, self.lat)
    }

    pub(crate) fn from_point(point: ::geo::Point<f64>) -> Self {
        Coordinates {
            lat: point.y(),
            lon: point.x(),
        }
    }
}
