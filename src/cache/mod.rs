pub mod memory;
pub mod redis;

use crate::constants::{GRAPH_CACHE_COORD_SCALE, GRAPH_CACHE_RADIUS_SCALE};
use crate::models::{Coordinates, StreetGraph};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use self::memory::MemoryGraphCache;
pub use self::redis::RedisGraphCache;

/// Storage for fetched street graphs, keyed by [`graph_cache_key`].
///
/// Lookups never fail: backend errors are logged and reported as misses.
#[async_trait]
pub trait GraphCache: Send + Sync {
    async fn get_graph(&self, key: &str) -> Option<Arc<StreetGraph>>;
    async fn cache_graph(&self, key: &str, graph: Arc<StreetGraph>);
    async fn get_stats(&self) -> CacheStats;
    async fn health_check(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Cache key for the walk network around `center`.
/// Coordinates are rounded to 3 decimal places (~100m), radius to 0.1km.
pub fn graph_cache_key(center: &Coordinates, radius_km: f64) -> String {
    let lat = (center.lat * GRAPH_CACHE_COORD_SCALE).round() as i64;
    let lon = (center.lon * GRAPH_CACHE_COORD_SCALE).round() as i64;
    let radius = (radius_km * GRAPH_CACHE_RADIUS_SCALE).round() as i64;

    format!("graph:walk:{}:{}:{}", lat, lon, radius)
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub connected: bool,
}

impl CacheStats {
    pub fn from_counts(hits: u64, misses: u64, connected: bool) -> Self {
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            connected,
        }
    }
}
