use crate::models::route::LatLon;
use crate::models::Route;

/// Ordered `{latitude, longitude}` points for transport. Empty routes encode
/// to an empty list.
pub fn to_coordinate_list(route: &Route) -> Vec<LatLon> {
    route
        .path
        .iter()
        .map(|c| LatLon {
            latitude: c.lat,
            longitude: c.lon,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    #[test]
    fn empty_route_encodes_to_empty_list() {
        assert!(to_coordinate_list(&Route::empty()).is_empty());
    }

    #[test]
    fn keeps_order_and_axis_names() {
        let route = Route {
            node_ids: vec![1, 2, 1],
            path: vec![
                Coordinates::new(37.5665, 126.9780).unwrap(),
                Coordinates::new(37.5670, 126.9790).unwrap(),
                Coordinates::new(37.5665, 126.9780).unwrap(),
            ],
            distance_km: 0.2,
        };

        let points = to_coordinate_list(&route);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].latitude, 37.5670);
        assert_eq!(points[1].longitude, 126.9790);

        let json = serde_json::to_value(&points[0]).unwrap();
        assert_eq!(json["latitude"], 37.5665);
        assert_eq!(json["longitude"], 126.9780);
    }
}
