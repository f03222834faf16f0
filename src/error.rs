use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Map data could not be obtained: source unreachable, timed out, or
    /// returned nothing walkable.
    #[error("Street graph unavailable: {0}")]
    GraphUnavailable(String),

    #[error("Street graph has no nodes")]
    EmptyGraph,

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::GraphUnavailable(ref e) => {
                tracing::error!("Street graph unavailable: {}", e);
                (StatusCode::BAD_GATEWAY, "Map data is unavailable for this area")
            }
            AppError::EmptyGraph => {
                tracing::error!("Street graph has no nodes");
                (StatusCode::BAD_GATEWAY, "Map data is unavailable for this area")
            }
            AppError::Cache(ref e) => {
                tracing::warn!("Cache error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Cache error")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "status": "error",
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_errors_map_to_bad_gateway() {
        let response = AppError::GraphUnavailable("timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::EmptyGraph.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_request_maps_to_bad_request() {
        let response = AppError::InvalidRequest("distance must be positive".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
