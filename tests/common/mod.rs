use async_trait::async_trait;
use runcourse::cache::{GraphCache, MemoryGraphCache};
use runcourse::config::RouteGeneratorConfig;
use runcourse::models::graph::EdgeTags;
use runcourse::models::{Coordinates, StreetGraph, StreetGraphBuilder};
use runcourse::services::graph_provider::{GraphProvider, StreetGraphSource};
use runcourse::services::route_generator::shortest_path::ShortestPathSolver;
use runcourse::services::route_generator::weighting::WeightedGraph;
use runcourse::services::route_generator::RouteGenerator;
use runcourse::{AppError, AppState, Result};
use petgraph::graph::NodeIndex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Seoul City Hall
pub const CITY_HALL: (f64, f64) = (37.5665, 126.9780);

/// Meters per degree of latitude on the haversine sphere
const METERS_PER_DEGREE: f64 = 111_195.0;

#[allow(dead_code)]
pub fn city_hall() -> Coordinates {
    Coordinates::new(CITY_HALL.0, CITY_HALL.1).unwrap()
}

/// Synthetic street grid around Seoul City Hall: 41 x 41 intersections, 100m
/// apart (about 2km in every direction), with one node exactly at City Hall.
///
/// Every fifth row and column is a primary road, the ones right after are park
/// footways and the rest residential streets, so scenic and quiet searches
/// see different costs.
#[derive(Default)]
pub struct GridSource {
    calls: AtomicUsize,
}

impl GridSource {
    const SIZE: i64 = 41;
    const SPACING_M: f64 = 100.0;

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn street_tags(line: i64) -> EdgeTags {
        let pairs: &[(&str, &str)] = match line % 5 {
            0 => &[("highway", "primary")],
            1 => &[("highway", "footway"), ("leisure", "park")],
            _ => &[("highway", "residential")],
        };
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn build_grid() -> StreetGraph {
        let size = Self::SIZE;
        let half = size / 2;
        let lat_step = Self::SPACING_M / METERS_PER_DEGREE;
        let lon_step = Self::SPACING_M / (METERS_PER_DEGREE * CITY_HALL.0.to_radians().cos());
        let id = |row: i64, col: i64| row * size + col + 1;

        let mut builder = StreetGraphBuilder::new();
        for row in 0..size {
            for col in 0..size {
                let coords = Coordinates::new(
                    CITY_HALL.0 + (row - half) as f64 * lat_step,
                    CITY_HALL.1 + (col - half) as f64 * lon_step,
                )
                .unwrap();
                builder.add_node(id(row, col), coords);
            }
        }
        for line in 0..size {
            builder.add_way(
                (0..size).map(|col| id(line, col)).collect(),
                Self::street_tags(line),
            );
            builder.add_way(
                (0..size).map(|row| id(row, line)).collect(),
                Self::street_tags(line),
            );
        }
        builder.build()
    }
}

#[async_trait]
impl StreetGraphSource for GridSource {
    async fn fetch_walk_network(&self, _center: &Coordinates, _radius_km: f64) -> Result<StreetGraph> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::build_grid())
    }

    fn source_name(&self) -> &'static str {
        "grid"
    }
}

/// Source whose map provider is unreachable.
#[allow(dead_code)]
pub struct FailingSource;

#[async_trait]
impl StreetGraphSource for FailingSource {
    async fn fetch_walk_network(&self, _center: &Coordinates, _radius_km: f64) -> Result<StreetGraph> {
        Err(AppError::GraphUnavailable(
            "connection refused".to_string(),
        ))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// Solver that never finds a path.
#[allow(dead_code)]
pub struct NoPathSolver;

impl ShortestPathSolver for NoPathSolver {
    fn shortest_path(
        &self,
        _graph: &WeightedGraph<'_>,
        _from: NodeIndex,
        _to: NodeIndex,
    ) -> Option<Vec<NodeIndex>> {
        None
    }
}

fn graph_cache() -> Arc<dyn GraphCache> {
    Arc::new(MemoryGraphCache::new(3600, 8))
}

/// Route generator with default settings on top of `source`.
#[allow(dead_code)]
pub fn build_generator(source: Arc<dyn StreetGraphSource>) -> RouteGenerator {
    let provider = GraphProvider::new(source, graph_cache(), Duration::from_secs(5));
    RouteGenerator::new(provider, RouteGeneratorConfig::default())
}

#[allow(dead_code)]
pub fn build_generator_with_solver(
    source: Arc<dyn StreetGraphSource>,
    solver: Arc<dyn ShortestPathSolver>,
) -> RouteGenerator {
    let provider = GraphProvider::new(source, graph_cache(), Duration::from_secs(5));
    RouteGenerator::with_solver(provider, solver, RouteGeneratorConfig::default())
}

/// Router around `generator`, sharing its graph cache.
#[allow(dead_code)]
pub fn build_app(generator: RouteGenerator) -> axum::Router {
    let graph_cache = Arc::clone(generator.graph_provider().cache());
    let state = Arc::new(AppState {
        route_generator: generator,
        graph_cache,
    });
    runcourse::routes::create_router(state)
}

/// Real Overpass tests only run when `RUN_REAL_API_TESTS` is set
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("RUN_REAL_API_TESTS").is_err()
}
