use crate::cache::{graph_cache_key, GraphCache};
use crate::error::{AppError, Result};
use crate::models::{Coordinates, StreetGraph};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Anything that can produce the walkable street network around a point.
#[async_trait]
pub trait StreetGraphSource: Send + Sync {
    /// Walk network within `radius_km` of `center`. Implementations must fail
    /// with [`AppError::GraphUnavailable`] rather than return an empty graph.
    async fn fetch_walk_network(&self, center: &Coordinates, radius_km: f64)
        -> Result<StreetGraph>;

    fn source_name(&self) -> &'static str;
}

/// Cache-fronted access to a [`StreetGraphSource`] with a bounded fetch time.
#[derive(Clone)]
pub struct GraphProvider {
    source: Arc<dyn StreetGraphSource>,
    cache: Arc<dyn GraphCache>,
    fetch_timeout: Duration,
}

impl GraphProvider {
    pub fn new(
        source: Arc<dyn StreetGraphSource>,
        cache: Arc<dyn GraphCache>,
        fetch_timeout: Duration,
    ) -> Self {
        GraphProvider {
            source,
            cache,
            fetch_timeout,
        }
    }

    pub fn cache(&self) -> &Arc<dyn GraphCache> {
        &self.cache
    }

    /// Concurrent misses for the same key may fetch twice; the last insert wins.
    #[instrument(skip(self, center), fields(lat = center.lat, lon = center.lon))]
    pub async fn fetch_walk_graph(
        &self,
        center: &Coordinates,
        radius_km: f64,
    ) -> Result<Arc<StreetGraph>> {
        let key = graph_cache_key(center, radius_km);

        if let Some(graph) = self.cache.get_graph(&key).await {
            tracing::debug!(nodes = graph.node_count(), "Using cached street graph");
            return Ok(graph);
        }

        let started = Instant::now();
        let fetch = self.source.fetch_walk_network(center, radius_km);
        let graph = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    source = self.source.source_name(),
                    timeout_secs = self.fetch_timeout.as_secs_f64(),
                    "Street graph fetch timed out"
                );
                return Err(AppError::GraphUnavailable(format!(
                    "{} did not respond within {:.0}s",
                    self.source.source_name(),
                    self.fetch_timeout.as_secs_f64()
                )));
            }
        };

        if graph.is_empty() {
            return Err(AppError::GraphUnavailable(format!(
                "{} returned no walkable streets",
                self.source.source_name()
            )));
        }

        tracing::info!(
            source = self.source.source_name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched street graph ({:.1}km radius)",
            radius_km
        );

        let graph = Arc::new(graph);
        self.cache.cache_graph(&key, Arc::clone(&graph)).await;
        Ok(graph)
    }
}
