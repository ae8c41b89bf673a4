use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use reco_api::api::{create_router, AppState};
use reco_api::model::SvdModel;

/// Model with users {1, 2} and items {A, B, C}. User 1 interacted with A
/// during training; with one-dimensional factors and zero biases the
/// predicted affinities for user 1 are simply the item factors:
/// A = 0.5, B = 0.9, C = 0.4. Item popularity is A: 5, B: 9, C: 1.
fn create_test_model() -> SvdModel {
    serde_json::from_value(json!({
        "global_mean": 0.0,
        "user_index": {"1": 0, "2": 1},
        "item_index": {"A": 0, "B": 1, "C": 2},
        "item_ids": ["A", "B", "C"],
        "user_biases": [0.0, 0.0],
        "item_biases": [0.0, 0.0, 0.0],
        "user_factors": [[1.0], [0.1]],
        "item_factors": [[0.5], [0.9], [0.4]],
        "user_histories": [[0], [1]],
        "item_counts": [5, 9, 1]
    }))
    .unwrap()
}

fn create_test_server() -> TestServer {
    let state = AppState::with_model(Arc::new(create_test_model()));
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["architecture"].is_string());
}

#[tokio::test]
async fn test_health_check_without_model() {
    let server = TestServer::new(create_router(AppState::unavailable())).unwrap();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_index_serves_exploration_page() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("recommandation"));
}

#[tokio::test]
async fn test_known_user_personalized_recommendations() {
    let server = create_test_server();

    let response = server
        .get("/recommendations?user_id=1&num_recommendations=2&exclude_seen=true")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], "1");
    assert_eq!(body["user_known"], "Oui");
    assert_eq!(body["num_recommendations"], 2);
    assert_eq!(body["recommendations"], json!(["B", "C"]));
}

#[tokio::test]
async fn test_known_user_without_excluding_seen() {
    let server = create_test_server();

    let response = server
        .get("/recommendations?user_id=1&num_recommendations=3&exclude_seen=false")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"], json!(["B", "A", "C"]));
}

#[tokio::test]
async fn test_unknown_user_popularity_fallback() {
    let server = create_test_server();

    let response = server
        .get("/recommendations?user_id=999&num_recommendations=2")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_known"], "Non");
    assert_eq!(body["recommendations"], json!(["B", "A"]));
}

#[tokio::test]
async fn test_unknown_user_ignores_exclude_seen() {
    let server = create_test_server();

    let with_flag = server
        .get("/recommendations?user_id=999&num_recommendations=3&exclude_seen=true")
        .await;
    let without_flag = server
        .get("/recommendations?user_id=999&num_recommendations=3&exclude_seen=false")
        .await;

    let a: serde_json::Value = with_flag.json();
    let b: serde_json::Value = without_flag.json();
    assert_eq!(a["recommendations"], b["recommendations"]);
}

#[tokio::test]
async fn test_missing_user_id_is_bad_request() {
    let server = create_test_server();

    let response = server.get("/recommendations").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing-Parameter");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_invalid_exclude_seen_is_bad_request() {
    let server = create_test_server();

    let response = server
        .get("/recommendations?user_id=1&exclude_seen=maybe")
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid-Parameter");
}

#[tokio::test]
async fn test_count_clamped_and_truncated() {
    let server = create_test_server();

    // Clamped to 100, then truncated to the three items that exist.
    let response = server
        .get("/recommendations?user_id=999&num_recommendations=5000")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["num_recommendations"], 3);

    // Zero is clamped up to one.
    let response = server
        .get("/recommendations?user_id=999&num_recommendations=0")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"], json!(["B"]));
}

#[tokio::test]
async fn test_post_with_json_body() {
    let server = create_test_server();

    let response = server
        .post("/recommendations")
        .json(&json!({
            "user_id": 1,
            "num_recommendations": 2,
            "exclude_seen": true
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], "1");
    assert_eq!(body["user_known"], "Oui");
    assert_eq!(body["recommendations"], json!(["B", "C"]));
}

#[tokio::test]
async fn test_post_with_string_user_id() {
    let server = create_test_server();

    let response = server
        .post("/recommendations")
        .json(&json!({"user_id": "nadia"}))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], "nadia");
    assert_eq!(body["user_known"], "Non");
}

#[tokio::test]
async fn test_query_parameters_win_over_body() {
    let server = create_test_server();

    let response = server
        .post("/recommendations?user_id=1&num_recommendations=2")
        .json(&json!({"user_id": 999, "num_recommendations": 1}))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], "1");
    assert_eq!(body["user_known"], "Oui");
    assert_eq!(body["num_recommendations"], 2);
}

#[tokio::test]
async fn test_model_unavailable_fails_fast() {
    let server = TestServer::new(create_router(AppState::unavailable())).unwrap();

    let response = server.get("/recommendations?user_id=1").await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Model-Unavailable");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_function_key_required_when_configured() {
    let state = AppState::with_model(Arc::new(create_test_model()))
        .with_function_key(Some("secret".to_string()));
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.get("/recommendations?user_id=1").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let response = server.get("/recommendations?user_id=1&code=wrong").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let response = server.get("/recommendations?user_id=1&code=secret").await;
    response.assert_status_ok();

    // Health and the form are never keyed.
    server.get("/health").await.assert_status_ok();
    server.get("/").await.assert_status_ok();
}
