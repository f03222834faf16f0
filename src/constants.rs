//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! For tuning knobs that benefit from runtime experimentation, see
//! [`RouteGeneratorConfig`](crate::config::RouteGeneratorConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "8000";

// --- Graph cache defaults ---

/// Default street-graph cache TTL: 1 hour. Overridden by `GRAPH_CACHE_TTL`.
pub const DEFAULT_GRAPH_CACHE_TTL_SECONDS: u64 = 3_600;
/// Maximum graphs held by the in-memory cache. Overridden by `GRAPH_CACHE_MAX_ENTRIES`.
pub const DEFAULT_GRAPH_CACHE_MAX_ENTRIES: u64 = 32;
/// Cache key precision: coordinates rounded to 3 decimals (~100m).
pub const GRAPH_CACHE_COORD_SCALE: f64 = 1_000.0;
/// Cache key precision: radius rounded to 0.1 km buckets.
pub const GRAPH_CACHE_RADIUS_SCALE: f64 = 10.0;

// --- Overpass ---

/// Public Overpass endpoints, tried round-robin. Overridden by `OVERPASS_ENDPOINTS`.
pub const DEFAULT_OVERPASS_ENDPOINTS: &[&str] = &[
    "https://overpass-api.de/api/interpreter",
    "https://overpass.private.coffee/api/interpreter",
    "https://maps.mail.ru/osm/tools/overpass/api/interpreter",
];
/// Server-side query timeout sent in the Overpass QL header, also used as the
/// per-request HTTP timeout.
pub const OVERPASS_QUERY_TIMEOUT_SECONDS: u64 = 45;
/// Retries after the first failed attempt (2 = 3 attempts in total).
pub const DEFAULT_OVERPASS_MAX_RETRIES: usize = 2;
/// Base delay for exponential backoff between attempts.
pub const OVERPASS_BACKOFF_BASE_MS: u64 = 1_000;
pub const OVERPASS_HTTP_TOO_MANY_REQUESTS: u16 = 429;
pub const OVERPASS_HTTP_GATEWAY_TIMEOUT: u16 = 504;

/// Overall deadline for one graph fetch, retries included. Overridden by
/// `GRAPH_FETCH_TIMEOUT_SECS`.
pub const DEFAULT_GRAPH_FETCH_TIMEOUT_SECONDS: u64 = 60;

// --- Triangle heuristic ---

/// Extra radius (km) added to `target / 2` when fetching the graph, so the
/// snapped waypoints stay inside the downloaded area.
pub const DEFAULT_FETCH_RADIUS_MARGIN_KM: f64 = 0.2;
/// Turn between consecutive triangle legs.
pub const TRIANGLE_TURN_DEGREES: f64 = 120.0;
/// Number of legs in one loop. The target distance is split evenly across them.
pub const TRIANGLE_LEG_COUNT: f64 = 3.0;

// --- Diversifier ---

/// Starting bearings used for alternative routes, one route per bearing.
pub const DEFAULT_CANDIDATE_BEARINGS: &[f64] = &[0.0, 120.0, 240.0];
/// Rough traversal time attributed to each point of a route.
pub const DEFAULT_MINUTES_PER_POINT: f64 = 0.1;
/// Alternatives generated when a request does not specify `count`.
pub const DEFAULT_ROUTE_COUNT: usize = 3;
/// Longest loop a request may ask for.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;
