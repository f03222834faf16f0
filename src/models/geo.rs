use crate::models::Coordinates;

/// Axis-aligned bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Compute a bounding box around a center point with a radius in meters.
    pub fn from_center_radius(center: &Coordinates, radius_m: f64) -> Self {
        let lat_delta = radius_m / 111_000.0;
        let lon_delta = if center.lat.abs() > 85.0 {
            lat_delta
        } else {
            radius_m / (111_000.0 * center.lat.to_radians().cos())
        };

        BoundingBox {
            min_lat: (center.lat - lat_delta).max(-90.0),
            max_lat: (center.lat + lat_delta).min(90.0),
            min_lon: (center.lon - lon_delta).max(-180.0),
            max_lon: (center.lon + lon_delta).min(180.0),
        }
    }

    /// Overpass QL bbox filter body: `south,west,north,east`.
    pub fn to_overpass(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}
