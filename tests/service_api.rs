// Integration tests for the game service HTTP API, driven in process through the router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use blotto_backend::api;
use blotto_backend::engine::game::Limits;
use blotto_backend::engine::server::GameServer;

fn test_app(max_combos: u64) -> Router {
    let limits = Limits {
        max_combos,
        max_work: 5_000_000_000,
    };
    let server = GameServer::new(5, 3, limits).unwrap();
    api::router(Arc::new(server), None)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let app = test_app(500);
    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_new_game_then_solve() {
    let app = test_app(500);

    let (status, body) = send(&app, "POST", "/new_game?troops=2&fields=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, body) = send(&app, "GET", "/solve_blotto").await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 5);
    assert_eq!(items[0], serde_json::json!([2, 0]));
    assert_eq!(items[2].as_f64(), Some(1.0));
}

#[tokio::test]
async fn test_solve_default_game() {
    let app = test_app(500);
    let (status, body) = send(&app, "GET", "/solve_blotto").await;
    assert_eq!(status, StatusCode::OK);

    let combo: Vec<u32> = serde_json::from_value(body[0].clone()).unwrap();
    assert_eq!(combo.iter().sum::<u32>(), 5);
    assert_eq!(combo.len(), 3);

    let total: f64 = (1..4).map(|i| body[i].as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_non_positive_troops_rejected_with_detail() {
    let app = test_app(500);
    let (status, body) = send(&app, "POST", "/new_game?troops=0&fields=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "troops must be positive");
}

#[tokio::test]
async fn test_malformed_parameters_rejected() {
    let app = test_app(500);

    let (status, body) = send(&app, "POST", "/new_game?troops=abc&fields=3").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "troops must be an integer");

    let (status, body) = send(&app, "POST", "/new_game?troops=4").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "fields is required");
}

#[tokio::test]
async fn test_oversized_game_rejected_and_previous_kept() {
    let app = test_app(50);

    let (status, body) = send(&app, "POST", "/new_game?troops=30&fields=5").await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].as_str().unwrap().contains("above the limit of 50"));

    // The startup 5/3 game is still the one solved.
    let (status, body) = send(&app, "GET", "/solve_blotto").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_huge_field_count_rejected_quickly() {
    let app = test_app(500);
    let start = std::time::Instant::now();
    let (status, body) = send(&app, "POST", "/new_game?troops=1&fields=4294967295").await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].as_str().unwrap().contains("combinations"));
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
}

#[tokio::test]
async fn test_expensive_game_rejected_by_work_cap() {
    let app = test_app(500);
    let (status, body) = send(&app, "POST", "/new_game?troops=1&fields=499").await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].as_str().unwrap().contains("battle evaluations"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    blotto_backend::metrics::register_metrics();
    let app = test_app(500);
    send(&app, "POST", "/new_game?troops=3&fields=2").await;

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("blotto_new_games_total"));
}
