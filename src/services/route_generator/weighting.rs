//! Preference-specific search weights.
//!
//! Weights only steer the path search. Route distance is always accounted
//! with physical edge lengths.

use crate::models::graph::{GraphEdge, StreetGraph};
use crate::models::Preference;
use petgraph::graph::EdgeIndex;

const SCENIC_WATERWAY_FACTOR: f64 = 0.5;
const SCENIC_PARK_FACTOR: f64 = 0.5;
const SCENIC_NATURAL_FACTOR: f64 = 0.6;
const SCENIC_PEDESTRIAN_FACTOR: f64 = 0.8;

const QUIET_PRIMARY_FACTOR: f64 = 2.0;
const QUIET_SECONDARY_FACTOR: f64 = 1.5;
const QUIET_TERTIARY_FACTOR: f64 = 1.2;
const QUIET_COMMERCIAL_FACTOR: f64 = 1.8;
const QUIET_CALM_STREET_FACTOR: f64 = 0.7;

/// Read-only view of a [`StreetGraph`] with one search weight per edge.
pub struct WeightedGraph<'g> {
    graph: &'g StreetGraph,
    preference: Preference,
    search_weights: Vec<f64>,
}

impl<'g> WeightedGraph<'g> {
    pub fn street_graph(&self) -> &'g StreetGraph {
        self.graph
    }

    pub fn preference(&self) -> Preference {
        self.preference
    }

    pub fn search_weight(&self, edge: EdgeIndex) -> f64 {
        self.search_weights[edge.index()]
    }
}

pub fn apply_preference_weights(graph: &StreetGraph, preference: Preference) -> WeightedGraph<'_> {
    let search_weights = graph
        .inner()
        .edge_weights()
        .map(|edge| edge.length_m * multiplier(edge, preference))
        .collect();

    WeightedGraph {
        graph,
        preference,
        search_weights,
    }
}

fn multiplier(edge: &GraphEdge, preference: Preference) -> f64 {
    match preference {
        Preference::None => 1.0,
        Preference::Scenic => scenic_multiplier(edge),
        Preference::Quiet => quiet_multiplier(edge),
    }
}

// Only the last matching rule applies; multipliers never compound. A park
// path that is also a footway therefore gets 0.8, not 0.5 * 0.8.
fn scenic_multiplier(edge: &GraphEdge) -> f64 {
    let mut factor = 1.0;

    if matches!(edge.tag("waterway"), Some("river" | "stream" | "canal")) {
        factor = SCENIC_WATERWAY_FACTOR;
    }
    if edge.tag("leisure") == Some("park") {
        factor = SCENIC_PARK_FACTOR;
    }
    if matches!(edge.tag("natural"), Some("wood" | "forest" | "tree_row")) {
        factor = SCENIC_NATURAL_FACTOR;
    }
    if matches!(edge.tag("highway"), Some("footway" | "path" | "pedestrian")) {
        factor = SCENIC_PEDESTRIAN_FACTOR;
    }

    factor
}

// Same last-rule-wins precedence: a primary road in a commercial area gets
// 1.8, not 2.0 * 1.8.
fn quiet_multiplier(edge: &GraphEdge) -> f64 {
    let mut factor = match edge.tag("highway") {
        Some("primary") => QUIET_PRIMARY_FACTOR,
        Some("secondary") => QUIET_SECONDARY_FACTOR,
        Some("tertiary") => QUIET_TERTIARY_FACTOR,
        _ => 1.0,
    };

    if matches!(edge.tag("landuse"), Some("commercial" | "retail")) {
        factor = QUIET_COMMERCIAL_FACTOR;
    }
    if matches!(
        edge.tag("highway"),
        Some("residential" | "pedestrian" | "footway" | "path")
    ) {
        factor = QUIET_CALM_STREET_FACTOR;
    }

    factor
}
