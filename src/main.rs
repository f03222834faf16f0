use runcourse::cache::{GraphCache, MemoryGraphCache, RedisGraphCache};
use runcourse::config::Config;
use runcourse::services::graph_provider::GraphProvider;
use runcourse::services::overpass::OverpassClient;
use runcourse::services::route_generator::RouteGenerator;
use runcourse::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runcourse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting runcourse API server");
    tracing::info!(
        endpoints = config.overpass_endpoints.len(),
        bearings = ?config.route_generator.candidate_bearings,
        "Configuration loaded successfully"
    );

    // Initialize graph cache: try Redis, fall back to in-memory
    let graph_cache: Arc<dyn GraphCache> = if let Some(ref redis_url) = config.redis_url {
        tracing::info!("Connecting to Redis cache...");
        match RedisGraphCache::new(redis_url, config.graph_cache_ttl).await {
            Ok(redis_cache) => Arc::new(redis_cache),
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Falling back to in-memory cache.",
                    e
                );
                Arc::new(MemoryGraphCache::new(
                    config.graph_cache_ttl,
                    config.graph_cache_max_entries,
                ))
            }
        }
    } else {
        tracing::info!("Redis URL not configured. Using in-memory cache.");
        Arc::new(MemoryGraphCache::new(
            config.graph_cache_ttl,
            config.graph_cache_max_entries,
        ))
    };

    // Initialize services
    let overpass = OverpassClient::new(
        config.overpass_endpoints.clone(),
        config.overpass_max_retries,
    );
    let graph_provider = GraphProvider::new(
        Arc::new(overpass),
        Arc::clone(&graph_cache),
        Duration::from_secs(config.graph_fetch_timeout_secs),
    );
    let route_generator = RouteGenerator::new(graph_provider, config.route_generator.clone());

    // Create application state
    let state = Arc::new(AppState {
        route_generator,
        graph_cache,
    });

    // Build router with CORS and tracing
    let app = runcourse::routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
