use crate::cache::{CacheStats, GraphCache};
use crate::models::StreetGraph;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory graph cache backed by moka with TTL and a bounded entry count.
/// Graphs are shared as `Arc`s, a hit never copies the graph.
pub struct MemoryGraphCache {
    graphs: Cache<String, Arc<StreetGraph>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryGraphCache {
    pub fn new(ttl_seconds: u64, max_entries: u64) -> Self {
        let graphs = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_entries)
            .build();

        MemoryGraphCache {
            graphs,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl GraphCache for MemoryGraphCache {
    async fn get_graph(&self, key: &str) -> Option<Arc<StreetGraph>> {
        match self.graphs.get(key).await {
            Some(graph) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache hit for graph: {}", key);
                Some(graph)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache miss for graph: {}", key);
                None
            }
        }
    }

    async fn cache_graph(&self, key: &str, graph: Arc<StreetGraph>) {
        let nodes = graph.node_count();
        self.graphs.insert(key.to_string(), graph).await;
        tracing::debug!(nodes, "Memory cached graph: {}", key);
    }

    async fn get_stats(&self) -> CacheStats {
        CacheStats::from_counts(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            true,
        )
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
