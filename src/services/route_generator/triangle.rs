use super::shortest_path::ShortestPathSolver;
use super::weighting::apply_preference_weights;
use crate::constants::{TRIANGLE_LEG_COUNT, TRIANGLE_TURN_DEGREES};
use crate::error::Result;
use crate::models::{Coordinates, Preference, Route, StreetGraph};
use crate::services::geodesy::destination_point;
use petgraph::graph::NodeIndex;
use std::sync::Arc;

/// Idealized corners of one loop: origin -> A -> B -> origin, each side a
/// third of the target distance, turning 120 degrees at A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleWaypoints {
    pub origin: Coordinates,
    pub a: Coordinates,
    pub b: Coordinates,
}

impl TriangleWaypoints {
    pub fn new(origin: Coordinates, target_distance_km: f64, bearing: f64) -> Self {
        let side_km = target_distance_km / TRIANGLE_LEG_COUNT;
        let a = destination_point(&origin, side_km, bearing);
        let b = destination_point(
            &a,
            side_km,
            (bearing + TRIANGLE_TURN_DEGREES).rem_euclid(360.0),
        );
        TriangleWaypoints { origin, a, b }
    }
}

/// Builds a closed loop out of three shortest-path legs on a fixed graph.
#[derive(Clone)]
pub struct TriangleComposer {
    solver: Arc<dyn ShortestPathSolver>,
}

impl TriangleComposer {
    pub fn new(solver: Arc<dyn ShortestPathSolver>) -> Self {
        Self { solver }
    }

    /// Compose a loop starting and ending at the node nearest `origin`.
    ///
    /// Returns an empty [`Route`] when any of the three legs has no path;
    /// a partial loop is never returned.
    pub fn compose(
        &self,
        graph: &StreetGraph,
        origin: &Coordinates,
        target_distance_km: f64,
        preference: Preference,
        bearing: f64,
    ) -> Result<Route> {
        let start = graph.nearest_node(origin)?;
        let waypoints = TriangleWaypoints::new(*origin, target_distance_km, bearing);
        let node_a = graph.nearest_node(&waypoints.a)?;
        let node_b = graph.nearest_node(&waypoints.b)?;

        tracing::debug!(
            bearing,
            a_lat = waypoints.a.lat,
            a_lon = waypoints.a.lon,
            b_lat = waypoints.b.lat,
            b_lon = waypoints.b.lon,
            "Triangle waypoints for bearing {:.0}",
            bearing
        );

        let weighted = apply_preference_weights(graph, preference);

        let mut legs = Vec::with_capacity(3);
        for (leg, (from, to)) in [(start, node_a), (node_a, node_b), (node_b, start)]
            .into_iter()
            .enumerate()
        {
            match self.solver.shortest_path(&weighted, from, to) {
                Some(path) => legs.push(path),
                None => {
                    tracing::info!(
                        leg = leg + 1,
                        bearing,
                        preference = %preference,
                        "No path for leg {} of the triangle, discarding route",
                        leg + 1
                    );
                    return Ok(Route::empty());
                }
            }
        }

        let nodes = join_legs(legs);
        Ok(realize(graph, &nodes))
    }
}

/// Concatenate legs, dropping the junction node each leg shares with the
/// previous one.
pub(crate) fn join_legs<T>(legs: Vec<Vec<T>>) -> Vec<T> {
    let mut joined = Vec::new();
    for (i, leg) in legs.into_iter().enumerate() {
        let skip = usize::from(i > 0);
        joined.extend(leg.into_iter().skip(skip));
    }
    joined
}

fn realize(graph: &StreetGraph, nodes: &[NodeIndex]) -> Route {
    // fold from +0.0: an empty float sum is -0.0
    let distance_m = nodes
        .windows(2)
        .map(|w| graph.edge_length_between(w[0], w[1]).unwrap_or(0.0))
        .fold(0.0, |acc, d| acc + d);

    let (node_ids, path) = nodes
        .iter()
        .filter_map(|&idx| graph.node(idx).map(|n| (n.osm_id, n.coordinates)))
        .unzip();

    Route {
        node_ids,
        path,
        distance_km: distance_m / 1000.0,
    }
}
