pub mod polyline;
pub mod shortest_path;
pub mod triangle;
pub mod weighting;

use crate::config::RouteGeneratorConfig;
use crate::error::{AppError, Result};
use crate::models::route::route_id;
use crate::models::{Coordinates, Preference, Route, RouteCandidate, RouteFeatures, RouteSet};
use crate::services::graph_provider::GraphProvider;

use futures::future::join_all;
use shortest_path::{DijkstraSolver, ShortestPathSolver};
use std::sync::Arc;
use tracing::instrument;
use triangle::TriangleComposer;

pub struct RouteGenerator {
    graph_provider: GraphProvider,
    composer: TriangleComposer,
    config: RouteGeneratorConfig,
}

impl RouteGenerator {
    pub fn new(graph_provider: GraphProvider, config: RouteGeneratorConfig) -> Self {
        Self::with_solver(graph_provider, Arc::new(DijkstraSolver), config)
    }

    pub fn with_solver(
        graph_provider: GraphProvider,
        solver: Arc<dyn ShortestPathSolver>,
        config: RouteGeneratorConfig,
    ) -> Self {
        RouteGenerator {
            graph_provider,
            composer: TriangleComposer::new(solver),
            config,
        }
    }

    pub fn config(&self) -> &RouteGeneratorConfig {
        &self.config
    }

    pub fn graph_provider(&self) -> &GraphProvider {
        &self.graph_provider
    }

    /// Radius of street network fetched around the start. The triangle never
    /// strays further than half the loop length from its origin.
    pub fn fetch_radius_km(&self, target_distance_km: f64) -> f64 {
        target_distance_km / 2.0 + self.config.fetch_radius_margin_km
    }

    /// Compose a single loop. Without a bearing, one is drawn uniformly from
    /// [0, 360).
    #[instrument(skip(self, origin), fields(lat = origin.lat, lon = origin.lon))]
    pub async fn compose_route(
        &self,
        origin: Coordinates,
        target_distance_km: f64,
        preference: Preference,
        bearing: Option<f64>,
    ) -> Result<Route> {
        let bearing = bearing.unwrap_or_else(|| rand::random::<f64>() * 360.0);
        let graph = self
            .graph_provider
            .fetch_walk_graph(&origin, self.fetch_radius_km(target_distance_km))
            .await?;

        let composer = self.composer.clone();
        let route = tokio::task::spawn_blocking(move || {
            composer.compose(&graph, &origin, target_distance_km, preference, bearing)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Route composition task failed: {}", e)))??;

        tracing::info!(
            bearing = %format!("{:.0}", bearing),
            points = route.point_count(),
            distance_km = %format!("{:.2}", route.distance_km),
            "Composed {} loop for {:.1}km target",
            preference,
            target_distance_km
        );

        Ok(route)
    }

    /// Compose up to `count` loops, one per candidate bearing, on a single
    /// graph fetch. Bearings without a complete loop are left out, so the
    /// result may hold fewer routes than asked for, or none at all.
    #[instrument(skip(self, origin), fields(lat = origin.lat, lon = origin.lon))]
    pub async fn compose_alternatives(
        &self,
        origin: Coordinates,
        target_distance_km: f64,
        preference: Preference,
        count: usize,
    ) -> Result<RouteSet> {
        let graph = self
            .graph_provider
            .fetch_walk_graph(&origin, self.fetch_radius_km(target_distance_km))
            .await?;

        let tasks = self
            .config
            .candidate_bearings
            .iter()
            .copied()
            .take(count)
            .enumerate()
            .map(|(slot, bearing)| {
                let graph = Arc::clone(&graph);
                let composer = self.composer.clone();
                tokio::task::spawn_blocking(move || {
                    let route =
                        composer.compose(&graph, &origin, target_distance_km, preference, bearing);
                    (slot, bearing, route)
                })
            });

        let mut routes = RouteSet::new();
        for joined in join_all(tasks).await {
            let (slot, bearing, route) = joined
                .map_err(|e| AppError::Internal(format!("Route composition task failed: {}", e)))?;
            let route = route?;

            if route.is_empty() {
                tracing::debug!(slot, bearing, "No loop for bearing {:.0}, skipping", bearing);
                continue;
            }

            routes.push(to_candidate(slot, &route, self.config.minutes_per_point));
        }

        tracing::info!(
            requested = count,
            generated = routes.len(),
            preference = %preference,
            "Generated {} of {} alternative loops for {:.1}km target",
            routes.len(),
            count,
            target_distance_km
        );

        Ok(routes)
    }
}

fn to_candidate(slot: usize, route: &Route, minutes_per_point: f64) -> RouteCandidate {
    let points = route.point_count();
    RouteCandidate {
        id: route_id(slot),
        route: polyline::to_coordinate_list(route),
        features: RouteFeatures {
            points,
            estimated_time: points as f64 * minutes_per_point,
            distance_km: route.distance_km,
        },
    }
}
