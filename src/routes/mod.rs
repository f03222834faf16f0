pub mod course;
pub mod debug;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(debug::index))
        .route("/generate_course", post(course::generate_course))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
