use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use runcourse::models::route::CourseRequest;
use runcourse::models::Preference;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{FailingSource, GridSource, NoPathSolver};

fn setup_test_app() -> axum::Router {
    common::build_app(common::build_generator(Arc::new(GridSource::default())))
}

async fn post_course(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/generate_course")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (status, json) = get_json(setup_test_app(), "/debug/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["graph_cache"]["backend"], "memory");
    assert_eq!(json["checks"]["graph_cache"]["healthy"], true);
}

#[tokio::test]
async fn test_index_lists_endpoints() {
    let (status, json) = get_json(setup_test_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], "runcourse");
    assert!(json["endpoints"]["POST /generate_course"].is_string());
}

#[tokio::test]
async fn test_generate_course_success() {
    let (status, json) = post_course(
        setup_test_app(),
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 3.0, "preference": "scenic"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");

    let routes = json["routes"].as_array().unwrap();
    assert!(!routes.is_empty());
    assert!(routes.len() <= 3);

    let first = &routes[0];
    assert_eq!(first["id"], "A");
    let points = first["route"].as_array().unwrap();
    assert!(points[0]["latitude"].is_f64());
    assert!(points[0]["longitude"].is_f64());
    assert_eq!(first["features"]["points"], points.len());
    assert!(first["features"]["estimated_time"].as_f64().unwrap() > 0.0);
    assert!(first["features"]["distance_km"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_generate_course_honors_count() {
    let (status, json) = post_course(
        setup_test_app(),
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 3.0, "preference": "none", "count": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["routes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_preference_falls_back_to_none() {
    let (status, json) = post_course(
        setup_test_app(),
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 3.0, "preference": "fastest"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
}

#[tokio::test]
async fn test_null_preference_falls_back_to_none() {
    let (status, json) = post_course(
        setup_test_app(),
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 3.0, "preference": null}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
}

#[tokio::test]
async fn test_generate_course_validation() {
    let invalid_requests = [
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 0.0}),
        json!({"lat": 37.5665, "lon": 126.9780, "distance": -2.0}),
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 500.0}),
        json!({"lat": 95.0, "lon": 126.9780, "distance": 3.0}),
        json!({"lat": 37.5665, "lon": 190.0, "distance": 3.0}),
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 3.0, "count": 0}),
    ];

    for body in invalid_requests {
        let (status, json) = post_course(setup_test_app(), body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "should reject {}", body);
        assert_eq!(json["status"], "error");
    }
}

#[tokio::test]
async fn test_graph_unavailable_is_bad_gateway() {
    let app = common::build_app(common::build_generator(Arc::new(FailingSource)));
    let (status, json) = post_course(
        app,
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 3.0}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], "error");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_no_routes_generated() {
    let app = common::build_app(common::build_generator_with_solver(
        Arc::new(GridSource::default()),
        Arc::new(NoPathSolver),
    ));
    let (status, json) = post_course(
        app,
        json!({"lat": 37.5665, "lon": 126.9780, "distance": 3.0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "error", "message": "No routes generated"}));
}

#[tokio::test]
async fn test_course_request_deserialization() {
    let request: CourseRequest = serde_json::from_value(json!({
        "lat": 37.5665,
        "lon": 126.9780,
        "distance": 5.0,
        "preference": "Quiet"
    }))
    .unwrap();

    assert_eq!(request.distance, 5.0);
    assert_eq!(request.preference, Preference::Quiet);
    assert_eq!(request.count, None);

    let request: CourseRequest =
        serde_json::from_value(json!({"lat": 37.5665, "lon": 126.9780, "distance": 5.0}))
            .unwrap();
    assert_eq!(request.preference, Preference::None);
}
