use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Environmental preference steering the path search.
///
/// Unknown labels and `null` fall back to [`Preference::None`] instead of
/// being rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Preference {
    #[default]
    None,
    Scenic,
    Quiet,
}

impl Preference {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "scenic" => Preference::Scenic,
            "quiet" => Preference::Quiet,
            _ => Preference::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::None => "none",
            Preference::Scenic => "scenic",
            Preference::Quiet => "quiet",
        }
    }
}

impl From<Option<String>> for Preference {
    fn from(label: Option<String>) -> Self {
        label.as_deref().map(Preference::from_label).unwrap_or_default()
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A realized loop through the street graph.
///
/// An empty route means no connecting path was found for one of the legs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    /// OSM ids of the visited nodes, start node first and last
    pub node_ids: Vec<i64>,
    pub path: Vec<Coordinates>,
    /// Sum of physical edge lengths along the path
    pub distance_km: f64,
}

impl Route {
    pub fn empty() -> Self {
        Route::default()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.path.len()
    }
}

/// Wire form of one route point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteFeatures {
    pub points: usize,
    /// Rough duration in minutes, a fixed constant per point
    pub estimated_time: f64,
    pub distance_km: f64,
}

/// One alternative in a [`RouteSet`], tagged with its slot letter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteCandidate {
    pub id: String,
    pub route: Vec<LatLon>,
    pub features: RouteFeatures,
}

pub type RouteSet = Vec<RouteCandidate>;

/// Letter for a bearing slot: 0 -> "A", 1 -> "B", ...
pub fn route_id(slot: usize) -> String {
    let letter = (b'A' + (slot % 26) as u8) as char;
    letter.to_string()
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub lat: f64,
    pub lon: f64,
    /// Target loop length in kilometers
    pub distance: f64,
    #[serde(default)]
    pub preference: Preference,
    #[serde(default)]
    pub count: Option<usize>,
}

impl CourseRequest {
    pub fn validate(&self, max_distance_km: f64) -> Result<Coordinates, String> {
        let origin = Coordinates::new(self.lat, self.lon)?;
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err("distance must be a positive number of kilometers".to_string());
        }
        if self.distance > max_distance_km {
            return Err(format!("distance must not exceed {} km", max_distance_km));
        }
        if self.count == Some(0) {
            return Err("count must be at least 1".to_string());
        }
        Ok(origin)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseResponse {
    pub status: String,
    pub routes: RouteSet,
}

impl CourseResponse {
    pub fn success(routes: RouteSet) -> Self {
        CourseResponse {
            status: "success".to_string(),
            routes,
        }
    }
}
