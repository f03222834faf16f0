use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if the graph cache is working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cache = &state.graph_cache;
    let healthy = cache.health_check().await;
    let stats = cache.get_stats().await;

    Json(json!({
        "status": if healthy { "ok" } else { "degraded" },
        "checks": {
            "graph_cache": {
                "backend": cache.backend_name(),
                "healthy": healthy,
                "stats": stats,
            }
        }
    }))
}

/// GET / - Service banner and endpoint index
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /generate_course": "Generate circular running routes",
            "GET /debug/health": "Graph cache health and statistics",
        }
    }))
}
