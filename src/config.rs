use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub redis_url: Option<String>, // Falls back to the in-memory graph cache when unset
    pub overpass_endpoints: Vec<String>,
    pub overpass_max_retries: usize,
    pub graph_fetch_timeout_secs: u64,
    pub graph_cache_ttl: u64,
    pub graph_cache_max_entries: u64,
    pub route_generator: RouteGeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct RouteGeneratorConfig {
    /// Added to `target / 2` to get the graph fetch radius.
    /// For a 3km loop with margin 0.2, the graph covers 1.7km around the start.
    pub fetch_radius_margin_km: f64,

    /// Starting bearings (degrees) for alternative routes, in slot order.
    /// Slot 0 is route "A", slot 1 is "B", and so on.
    pub candidate_bearings: Vec<f64>,

    /// Fixed per-point time constant used for the rough duration estimate
    pub minutes_per_point: f64,

    /// Upper bound accepted for a requested loop length
    pub max_distance_km: f64,

    /// Alternatives generated when the request omits `count`
    pub default_route_count: usize,
}

impl Default for RouteGeneratorConfig {
    fn default() -> Self {
        Self {
            fetch_radius_margin_km: DEFAULT_FETCH_RADIUS_MARGIN_KM,
            candidate_bearings: DEFAULT_CANDIDATE_BEARINGS.to_vec(),
            minutes_per_point: DEFAULT_MINUTES_PER_POINT,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            default_route_count: DEFAULT_ROUTE_COUNT,
        }
    }
}

impl RouteGeneratorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let candidate_bearings = match env::var("ROUTE_CANDIDATE_BEARINGS") {
            Ok(raw) => parse_bearings(&raw)?,
            Err(_) => defaults.candidate_bearings,
        };

        let config = Self {
            fetch_radius_margin_km: env::var("ROUTE_FETCH_RADIUS_MARGIN_KM")
                .unwrap_or_else(|_| defaults.fetch_radius_margin_km.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_FETCH_RADIUS_MARGIN_KM")?,

            candidate_bearings,

            minutes_per_point: env::var("ROUTE_MINUTES_PER_POINT")
                .unwrap_or_else(|_| defaults.minutes_per_point.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_MINUTES_PER_POINT")?,

            max_distance_km: env::var("ROUTE_MAX_DISTANCE_KM")
                .unwrap_or_else(|_| defaults.max_distance_km.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_MAX_DISTANCE_KM")?,

            default_route_count: env::var("ROUTE_DEFAULT_COUNT")
                .unwrap_or_else(|_| defaults.default_route_count.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_DEFAULT_COUNT")?,
        };

        if config.fetch_radius_margin_km < 0.0 {
            return Err("ROUTE_FETCH_RADIUS_MARGIN_KM must not be negative".to_string());
        }
        if config.max_distance_km <= 0.0 {
            return Err("ROUTE_MAX_DISTANCE_KM must be positive".to_string());
        }
        if config.default_route_count == 0 {
            return Err("ROUTE_DEFAULT_COUNT must be at least 1".to_string());
        }

        Ok(config)
    }
}

/// Parse a comma-separated bearing list such as `0,120,240`.
fn parse_bearings(raw: &str) -> Result<Vec<f64>, String> {
    let bearings = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("Invalid bearing in ROUTE_CANDIDATE_BEARINGS: {}", s))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if bearings.is_empty() {
        return Err("ROUTE_CANDIDATE_BEARINGS must list at least one bearing".to_string());
    }

    Ok(bearings)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let overpass_endpoints: Vec<String> = match env::var("OVERPASS_ENDPOINTS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => DEFAULT_OVERPASS_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        if overpass_endpoints.is_empty() {
            return Err("OVERPASS_ENDPOINTS must list at least one endpoint".to_string());
        }

        let graph_fetch_timeout_secs: u64 = env::var("GRAPH_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_GRAPH_FETCH_TIMEOUT_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid GRAPH_FETCH_TIMEOUT_SECS")?;

        if graph_fetch_timeout_secs == 0 {
            return Err("GRAPH_FETCH_TIMEOUT_SECS must be at least 1".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            redis_url: env::var("REDIS_URL").ok(),
            overpass_endpoints,
            overpass_max_retries: env::var("OVERPASS_MAX_RETRIES")
                .unwrap_or_else(|_| DEFAULT_OVERPASS_MAX_RETRIES.to_string())
                .parse()
                .map_err(|_| "Invalid OVERPASS_MAX_RETRIES")?,
            graph_fetch_timeout_secs,
            graph_cache_ttl: env::var("GRAPH_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_GRAPH_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid GRAPH_CACHE_TTL")?,
            graph_cache_max_entries: env::var("GRAPH_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| DEFAULT_GRAPH_CACHE_MAX_ENTRIES.to_string())
                .parse()
                .map_err(|_| "Invalid GRAPH_CACHE_MAX_ENTRIES")?,
            route_generator: RouteGeneratorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
