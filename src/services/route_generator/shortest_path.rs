use super::weighting::WeightedGraph;
use petgraph::algo::astar;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

/// Finds a minimum search-weight path between two nodes of a weighted graph.
pub trait ShortestPathSolver: Send + Sync {
    /// Ordered node path from `from` to `to`, both included, or `None` when
    /// the nodes are not connected. `from == to` yields a single-node path.
    fn shortest_path(
        &self,
        graph: &WeightedGraph<'_>,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Option<Vec<NodeIndex>>;
}

/// Dijkstra search: petgraph's A* with a zero heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraSolver;

impl ShortestPathSolver for DijkstraSolver {
    fn shortest_path(
        &self,
        graph: &WeightedGraph<'_>,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Option<Vec<NodeIndex>> {
        astar(
            graph.street_graph().inner(),
            from,
            |node| node == to,
            |edge| graph.search_weight(edge.id()),
            |_| 0.0,
        )
        .map(|(_cost, path)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::graph::EdgeTags;
    use crate::models::{Coordinates, Preference, StreetGraph, StreetGraphBuilder};
    use crate::services::route_generator::weighting::apply_preference_weights;

    fn tags(highway: &str) -> EdgeTags {
        EdgeTags::from([("highway".to_string(), highway.to_string())])
    }

    /// Two parallel routes from node 1 to node 4:
    /// a short primary road through node 2 and a longer footway through node 3.
    fn diamond() -> StreetGraph {
        let mut builder = StreetGraphBuilder::new();
        builder
            .add_node(1, Coordinates::new(37.5000, 127.0000).unwrap())
            .add_node(2, Coordinates::new(37.5010, 127.0005).unwrap())
            .add_node(3, Coordinates::new(37.5010, 126.9985).unwrap())
            .add_node(4, Coordinates::new(37.5020, 127.0000).unwrap())
            .add_way(vec![1, 2, 4], tags("primary"))
            .add_way(vec![1, 3, 4], tags("footway"));
        builder.build()
    }

    fn osm_path(graph: &StreetGraph, path: &[NodeIndex]) -> Vec<i64> {
        path.iter().map(|&n| graph.node(n).unwrap().osm_id).collect()
    }

    #[test]
    fn none_preference_takes_shortest_street() {
        let graph = diamond();
        let weighted = apply_preference_weights(&graph, Preference::None);
        let from = graph.node_index(1).unwrap();
        let to = graph.node_index(4).unwrap();

        let path = DijkstraSolver.shortest_path(&weighted, from, to).unwrap();
        assert_eq!(osm_path(&graph, &path), vec![1, 2, 4]);
    }

    #[test]
    fn quiet_preference_detours_around_primary_road() {
        let graph = diamond();
        let weighted = apply_preference_weights(&graph, Preference::Quiet);
        let from = graph.node_index(1).unwrap();
        let to = graph.node_index(4).unwrap();

        let path = DijkstraSolver.shortest_path(&weighted, from, to).unwrap();
        assert_eq!(osm_path(&graph, &path), vec![1, 3, 4]);
    }

    #[test]
    fn same_node_yields_single_node_path() {
        let graph = diamond();
        let weighted = apply_preference_weights(&graph, Preference::None);
        let node = graph.node_index(2).unwrap();
        assert_eq!(
            DijkstraSolver.shortest_path(&weighted, node, node),
            Some(vec![node])
        );
    }

    #[test]
    fn disconnected_nodes_have_no_path() {
        // Snapshots skip component filtering, so an isolated node survives.
        let mut snapshot = diamond().to_snapshot();
        snapshot.nodes.push(crate::models::graph::NodeSnapshot {
            id: 99,
            lat: 37.6,
            lon: 127.1,
        });
        let graph = StreetGraph::from_snapshot(snapshot);
        let weighted = apply_preference_weights(&graph, Preference::None);

        let from = graph.node_index(1).unwrap();
        let island = graph.node_index(99).unwrap();
        assert_eq!(DijkstraSolver.shortest_path(&weighted, from, island), None);
    }
}
