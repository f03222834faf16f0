use crate::cache::{CacheStats, GraphCache};
use crate::error::{AppError, Result};
use crate::models::{GraphSnapshot, StreetGraph};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;

/// Redis-backed graph cache. Graphs are stored as JSON snapshots and the
/// spatial index is rebuilt on every hit.
pub struct RedisGraphCache {
    connection: ConnectionManager,
    graph_cache_ttl: u64,
}

impl RedisGraphCache {
    pub async fn new(redis_url: &str, graph_cache_ttl: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to Redis: {}", e)))?;

        tracing::info!("Redis cache connection established");

        Ok(RedisGraphCache {
            connection,
            graph_cache_ttl,
        })
    }
}

#[async_trait]
impl GraphCache for RedisGraphCache {
    async fn get_graph(&self, key: &str) -> Option<Arc<StreetGraph>> {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<Option<String>> = conn.get(key).await;

        match result {
            Ok(Some(json)) => match serde_json::from_str::<GraphSnapshot>(&json) {
                Ok(snapshot) => {
                    tracing::debug!("Cache hit for graph: {}", key);
                    Some(Arc::new(StreetGraph::from_snapshot(snapshot)))
                }
                Err(e) => {
                    tracing::warn!("Failed to deserialize cached graph: {}", e);
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("Cache miss for graph: {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("Redis error getting graph: {}", e);
                None
            }
        }
    }

    async fn cache_graph(&self, key: &str, graph: Arc<StreetGraph>) {
        let json = match serde_json::to_string(&graph.to_snapshot()) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize graph for cache: {}", e);
                return;
            }
        };

        let mut conn = self.connection.clone();
        let result: redis::RedisResult<()> = conn.set_ex(key, json, self.graph_cache_ttl).await;

        match result {
            Ok(()) => {
                tracing::debug!(
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "Cached graph with TTL {}s: {}",
                    self.graph_cache_ttl,
                    key
                );
            }
            Err(e) => {
                tracing::warn!("Failed to cache graph: {}", e);
            }
        }
    }

    async fn get_stats(&self) -> CacheStats {
        let mut conn = self.connection.clone();
        let info: redis::RedisResult<String> =
            redis::cmd("INFO").arg("stats").query_async(&mut conn).await;

        match info {
            Ok(info_str) => CacheStats::from_counts(
                parse_info_value(&info_str, "keyspace_hits"),
                parse_info_value(&info_str, "keyspace_misses"),
                true,
            ),
            Err(_) => CacheStats::from_counts(0, 0, false),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

fn parse_info_value(info: &str, key: &str) -> u64 {
    info.lines()
        .find(|line| line.starts_with(key))
        .and_then(|line| line.split(':').nth(1))
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(0)
}
