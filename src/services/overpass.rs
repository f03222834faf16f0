use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::geo::BoundingBox;
use crate::models::graph::EdgeTags;
use crate::models::{Coordinates, StreetGraph, StreetGraphBuilder};
use crate::services::graph_provider::StreetGraphSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Way filter for pedestrian-accessible streets, equivalent to the common
/// "walk" network definition: no areas, private access, motorways, cycleways,
/// construction, or ways where foot traffic is prohibited.
const WALK_WAY_FILTER: &str = concat!(
    r#"["highway"]["area"!~"yes"]["access"!~"private"]"#,
    r#"["highway"!~"abandoned|bus_guideway|construction|cycleway|motor|no|planned|platform|proposed|raceway|razed"]"#,
    r#"["foot"!~"no"]["service"!~"private"]"#,
);

/// Overpass API client producing walk networks, with round-robin endpoint
/// fallback and exponential backoff.
#[derive(Clone)]
pub struct OverpassClient {
    client: Client,
    endpoints: Vec<String>,
    current_endpoint_idx: Arc<AtomicUsize>,
    max_retries: usize,
}

impl OverpassClient {
    pub fn new(endpoints: Vec<String>, max_retries: usize) -> Self {
        let endpoints = if endpoints.is_empty() {
            DEFAULT_OVERPASS_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            endpoints
        };

        OverpassClient {
            client: Client::new(),
            endpoints,
            current_endpoint_idx: Arc::new(AtomicUsize::new(0)),
            max_retries,
        }
    }

    /// Get the next endpoint to try (round-robin)
    fn get_next_endpoint(&self) -> String {
        let idx = self.current_endpoint_idx.fetch_add(1, Ordering::Relaxed);
        self.endpoints[idx % self.endpoints.len()].clone()
    }

    fn build_query(center: &Coordinates, radius_km: f64) -> String {
        let bbox = BoundingBox::from_center_radius(center, radius_km * 1000.0);
        format!(
            "[out:json][timeout:{}];(way{}({});>;);out body qt;",
            OVERPASS_QUERY_TIMEOUT_SECONDS,
            WALK_WAY_FILTER,
            bbox.to_overpass()
        )
    }

    /// POST the query, retrying HTTP 429/504 and transport errors with
    /// exponential backoff (1s, 2s, 4s, ...).
    async fn execute_query_with_retry(&self, query: &str) -> Result<OverpassResponse> {
        let mut retry_count = 0;

        loop {
            let endpoint = self.get_next_endpoint();

            let response_result = self
                .client
                .post(&endpoint)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(format!("data={}", urlencoding::encode(query)))
                .timeout(Duration::from_secs(OVERPASS_QUERY_TIMEOUT_SECONDS))
                .send()
                .await;

            let response = match response_result {
                Ok(resp) => resp,
                Err(e) => {
                    let error_msg = if e.is_timeout() {
                        "Request timed out".to_string()
                    } else {
                        format!("Request failed: {}", e)
                    };

                    if retry_count < self.max_retries {
                        retry_count += 1;
                        let backoff_ms = backoff_ms(retry_count);

                        tracing::warn!(
                            "Overpass walk query {} ({}), retrying in {}ms (attempt {}/{})",
                            error_msg,
                            endpoint,
                            backoff_ms,
                            retry_count + 1,
                            self.max_retries + 1
                        );

                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                        continue;
                    }

                    return Err(AppError::GraphUnavailable(format!(
                        "{} after {} attempts",
                        error_msg,
                        self.max_retries + 1
                    )));
                }
            };

            let status = response.status();

            if status.is_success() {
                return response.json().await.map_err(|e| {
                    AppError::GraphUnavailable(format!("Failed to parse Overpass response: {}", e))
                });
            }

            let is_retryable = status.as_u16() == OVERPASS_HTTP_TOO_MANY_REQUESTS
                || status.as_u16() == OVERPASS_HTTP_GATEWAY_TIMEOUT;

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if is_retryable && retry_count < self.max_retries {
                retry_count += 1;
                let backoff_ms = backoff_ms(retry_count);

                tracing::warn!(
                    "Overpass walk query returned HTTP {}, retrying in {}ms (attempt {}/{})",
                    status,
                    backoff_ms,
                    retry_count + 1,
                    self.max_retries + 1
                );

                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                continue;
            }

            return Err(AppError::GraphUnavailable(format!(
                "Overpass HTTP {}: {}",
                status, error_text
            )));
        }
    }
}

fn backoff_ms(retry_count: usize) -> u64 {
    OVERPASS_BACKOFF_BASE_MS * 2_u64.pow(retry_count.saturating_sub(1) as u32)
}

/// Turn raw Overpass elements into a street graph. Fails when the area holds
/// no walkable way.
fn build_street_graph(elements: Vec<OverpassElement>) -> Result<StreetGraph> {
    let mut builder = StreetGraphBuilder::new();
    let mut skipped_nodes = 0usize;

    for element in elements {
        match element {
            OverpassElement::Node { id, lat, lon } => match Coordinates::new(lat, lon) {
                Ok(coords) => {
                    builder.add_node(id, coords);
                }
                Err(_) => skipped_nodes += 1,
            },
            OverpassElement::Way { nodes, tags } => {
                builder.add_way(nodes, tags);
            }
            OverpassElement::Other => {}
        }
    }

    if skipped_nodes > 0 {
        tracing::debug!(skipped_nodes, "Skipped nodes with invalid coordinates");
    }

    if builder.way_count() == 0 {
        return Err(AppError::GraphUnavailable(
            "No walkable streets in the requested area".to_string(),
        ));
    }

    let graph = builder.build();
    if graph.is_empty() {
        return Err(AppError::GraphUnavailable(
            "Walkable ways reference no known nodes".to_string(),
        ));
    }

    Ok(graph)
}

#[async_trait]
impl StreetGraphSource for OverpassClient {
    async fn fetch_walk_network(
        &self,
        center: &Coordinates,
        radius_km: f64,
    ) -> Result<StreetGraph> {
        let query = Self::build_query(center, radius_km);
        tracing::debug!("Overpass walk query: {}", query);

        let response = self.execute_query_with_retry(&query).await?;
        let element_count = response.elements.len();
        let graph = build_street_graph(response.elements)?;

        tracing::debug!(
            elements = element_count,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built walk network from Overpass response"
        );

        Ok(graph)
    }

    fn source_name(&self) -> &'static str {
        "overpass"
    }
}

// Overpass API response types

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        nodes: Vec<i64>,
        #[serde(default)]
        tags: EdgeTags,
    },
    #[serde(other)]
    Other,
}
