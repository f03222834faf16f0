use crate::error::{AppError, Result};
use crate::models::route::{CourseRequest, CourseResponse};
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// POST /generate_course
/// Generate alternative running loops that start and end at the same point
pub async fn generate_course(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CourseRequest>,
) -> Result<Response> {
    let generator = &state.route_generator;
    let origin = request
        .validate(generator.config().max_distance_km)
        .map_err(AppError::InvalidRequest)?;
    let count = request
        .count
        .unwrap_or(generator.config().default_route_count);

    tracing::info!(
        lat = origin.lat,
        lon = origin.lon,
        distance_km = request.distance,
        preference = %request.preference,
        count,
        "Course request: ({:.4}, {:.4}), {:.1}km, preference={}",
        origin.lat, origin.lon, request.distance, request.preference
    );

    let routes = generator
        .compose_alternatives(origin, request.distance, request.preference, count)
        .await?;

    if routes.is_empty() {
        tracing::warn!(
            lat = origin.lat,
            lon = origin.lon,
            distance_km = request.distance,
            "No routes generated"
        );
        let body = json!({
            "status": "error",
            "message": "No routes generated",
        });
        return Ok(Json(body).into_response());
    }

    Ok(Json(CourseResponse::success(routes)).into_response())
}
