//! Walkable street network.
//!
//! Nodes are OSM nodes (intersections and shape points), edges are the
//! segments between consecutive nodes of a walkable way. The graph is
//! undirected: pedestrians may traverse a way in either direction.

use crate::error::{AppError, Result};
use crate::models::Coordinates;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// OSM tags of the way an edge belongs to. Shared by every segment of the way.
pub type EdgeTags = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub osm_id: i64,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone)]
pub struct GraphEdge {
    /// Physical length in meters
    pub length_m: f64,
    pub tags: Arc<EdgeTags>,
}

impl GraphEdge {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

type IndexedNode = GeomWithData<[f64; 2], NodeIndex>;

/// Immutable street graph with a spatial index for nearest-node lookups.
pub struct StreetGraph {
    graph: UnGraph<GraphNode, GraphEdge>,
    node_lookup: HashMap<i64, NodeIndex>,
    spatial_index: RTree<IndexedNode>,
    /// cos(mean latitude), scales longitudes so the index is roughly isotropic
    lon_scale: f64,
}

impl StreetGraph {
    fn from_graph(graph: UnGraph<GraphNode, GraphEdge>) -> Self {
        let lon_scale = if graph.node_count() == 0 {
            1.0
        } else {
            let mean_lat = graph
                .node_weights()
                .map(|n| n.coordinates.lat)
                .sum::<f64>()
                / graph.node_count() as f64;
            mean_lat.to_radians().cos().max(1e-6)
        };

        let node_lookup = graph
            .node_indices()
            .map(|idx| (graph[idx].osm_id, idx))
            .collect();

        let points: Vec<IndexedNode> = graph
            .node_indices()
            .map(|idx| GeomWithData::new(project(&graph[idx].coordinates, lon_scale), idx))
            .collect();

        StreetGraph {
            graph,
            node_lookup,
            spatial_index: RTree::bulk_load(points),
            lon_scale,
        }
    }

    /// Node closest to `target`. Fails with [`AppError::EmptyGraph`] when the
    /// graph has no nodes.
    pub fn nearest_node(&self, target: &Coordinates) -> Result<NodeIndex> {
        let query = project(target, self.lon_scale);
        self.spatial_index
            .nearest_neighbor(&query)
            .map(|entry| entry.data)
            .ok_or(AppError::EmptyGraph)
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    pub fn coordinates(&self, idx: NodeIndex) -> Option<Coordinates> {
        self.node(idx).map(|n| n.coordinates)
    }

    pub fn node_index(&self, osm_id: i64) -> Option<NodeIndex> {
        self.node_lookup.get(&osm_id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn inner(&self) -> &UnGraph<GraphNode, GraphEdge> {
        &self.graph
    }

    /// Length of the shortest edge joining `a` and `b`, if they are adjacent.
    pub fn edge_length_between(&self, a: NodeIndex, b: NodeIndex) -> Option<f64> {
        self.graph
            .edges_connecting(a, b)
            .map(|e| e.weight().length_m)
            .min_by(|x, y| x.total_cmp(y))
    }

    pub fn to_snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .graph
            .node_weights()
            .map(|n| NodeSnapshot {
                id: n.osm_id,
                lat: n.coordinates.lat,
                lon: n.coordinates.lon,
            })
            .collect();

        let edges = self
            .graph
            .edge_references()
            .map(|e| EdgeSnapshot {
                from: self.graph[e.source()].osm_id,
                to: self.graph[e.target()].osm_id,
                length_m: e.weight().length_m,
                tags: (*e.weight().tags).clone(),
            })
            .collect();

        GraphSnapshot { nodes, edges }
    }

    /// Rebuild a graph from a snapshot. Edges pointing at unknown nodes and
    /// nodes with invalid coordinates are dropped.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut lookup = HashMap::with_capacity(snapshot.nodes.len());

        for node in snapshot.nodes {
            if let Ok(coordinates) = Coordinates::new(node.lat, node.lon) {
                let idx = graph.add_node(GraphNode {
                    osm_id: node.id,
                    coordinates,
                });
                lookup.insert(node.id, idx);
            }
        }

        for edge in snapshot.edges {
            if let (Some(&a), Some(&b)) = (lookup.get(&edge.from), lookup.get(&edge.to)) {
                graph.add_edge(
                    a,
                    b,
                    GraphEdge {
                        length_m: edge.length_m,
                        tags: Arc::new(edge.tags),
                    },
                );
            }
        }

        StreetGraph::from_graph(graph)
    }
}

impl fmt::Debug for StreetGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreetGraph")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}

fn project(c: &Coordinates, lon_scale: f64) -> [f64; 2] {
    [c.lon * lon_scale, c.lat]
}

/// Collects OSM nodes and ways, then turns them into a [`StreetGraph`].
#[derive(Debug, Default)]
pub struct StreetGraphBuilder {
    nodes: HashMap<i64, Coordinates>,
    ways: Vec<(Vec<i64>, Arc<EdgeTags>)>,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, osm_id: i64, coordinates: Coordinates) -> &mut Self {
        self.nodes.insert(osm_id, coordinates);
        self
    }

    pub fn add_way(&mut self, node_ids: Vec<i64>, tags: EdgeTags) -> &mut Self {
        self.ways.push((node_ids, Arc::new(tags)));
        self
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// Split every way into node-to-node edges, keep only nodes referenced by
    /// a way, then keep the largest connected component.
    pub fn build(self) -> StreetGraph {
        let mut graph: UnGraph<GraphNode, GraphEdge> = UnGraph::new_undirected();
        let mut lookup: HashMap<i64, NodeIndex> = HashMap::new();

        for (node_ids, tags) in &self.ways {
            for pair in node_ids.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a == b {
                    continue;
                }
                let (Some(&coord_a), Some(&coord_b)) = (self.nodes.get(&a), self.nodes.get(&b))
                else {
                    continue;
                };

                let idx_a = *lookup.entry(a).or_insert_with(|| {
                    graph.add_node(GraphNode {
                        osm_id: a,
                        coordinates: coord_a,
                    })
                });
                let idx_b = *lookup.entry(b).or_insert_with(|| {
                    graph.add_node(GraphNode {
                        osm_id: b,
                        coordinates: coord_b,
                    })
                });

                graph.add_edge(
                    idx_a,
                    idx_b,
                    GraphEdge {
                        length_m: coord_a.distance_to(&coord_b) * 1000.0,
                        tags: Arc::clone(tags),
                    },
                );
            }
        }

        StreetGraph::from_graph(retain_largest_component(graph))
    }
}

fn retain_largest_component(
    graph: UnGraph<GraphNode, GraphEdge>,
) -> UnGraph<GraphNode, GraphEdge> {
    // On an undirected graph every strongly connected component is a plain
    // connected component.
    let components = tarjan_scc(&graph);
    let Some(largest) = components.iter().max_by_key(|c| c.len()) else {
        return graph;
    };
    if largest.len() == graph.node_count() {
        return graph;
    }

    tracing::debug!(
        components = components.len(),
        kept = largest.len(),
        dropped = graph.node_count() - largest.len(),
        "Dropping disconnected street fragments"
    );

    let keep: HashSet<NodeIndex> = largest.iter().copied().collect();
    graph.filter_map(
        |idx, node| keep.contains(&idx).then(|| node.clone()),
        |_, edge| Some(edge.clone()),
    )
}

/// Plain serializable form of a [`StreetGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub from: i64,
    pub to: i64,
    pub length_m: f64,
    #[serde(default)]
    pub tags: EdgeTags,
}
