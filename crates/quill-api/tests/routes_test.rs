//! Credential check, catalog and article reads, health.
//!
//! Run with: `cargo test -p quill-api --test routes_test`

mod helpers;

use helpers::{setup_test_app, setup_test_app_with, TEST_IDENTIFIER, TEST_SECRET};
use quill_infra::REQUEST_ID_HEADER;
use serde_json::{json, Value};

#[tokio::test]
async fn test_authenticate_accepts_known_account() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/authenticate")
        .json(&json!({ "username": TEST_IDENTIFIER, "password": TEST_SECRET }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "status": 200 }));
    assert_eq!(app.calls(), vec!["verify".to_string()]);
}

#[tokio::test]
async fn test_authenticate_rejects_wrong_secret() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/authenticate")
        .json(&json!({ "username": TEST_IDENTIFIER, "password": "wilma" }))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_authenticate_store_fault_is_500() {
    let app = setup_test_app().await;
    app.accounts.set_unavailable(true);

    let response = app
        .client()
        .post("/authenticate")
        .json(&json!({ "username": TEST_IDENTIFIER, "password": TEST_SECRET }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_authenticate_malformed_body_is_400() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/authenticate")
        .json(&json!({ "username": 42 }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    assert!(app.calls().is_empty());
}

#[tokio::test]
async fn test_error_details_follow_configured_environment() {
    let development = setup_test_app().await;
    let response = development
        .client()
        .post("/authenticate")
        .json(&json!({ "username": 42 }))
        .await;
    assert!(response.json::<Value>().get("details").is_some());

    let production = setup_test_app_with(&[
        ("ENVIRONMENT", ""),
        ("APP_ENV", "production"),
        ("CORS_ORIGINS", "https://quill.example"),
    ])
    .await;
    let response = production
        .client()
        .post("/authenticate")
        .json(&json!({ "username": 42 }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_get_game() {
    let app = setup_test_app().await;

    let response = app.client().get("/game/7").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["gid"], 7);
    assert_eq!(body["name"], "Catan");
    assert_eq!(body["year"], 1995);
    assert_eq!(body["url"], "https://boardgamegeek.com/boardgame/7");
    assert!(body["image"].is_null());
}

#[tokio::test]
async fn test_get_missing_game_is_404() {
    let app = setup_test_app().await;

    let response = app.client().get("/game/8").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_game_with_non_numeric_id_is_400() {
    let app = setup_test_app().await;

    let response = app.client().get("/game/catan").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_get_missing_article_is_404() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/article/5f8d0d55b54764421b7156c9")
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_health_reports_every_store() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "status": "healthy",
            "database": "healthy",
            "document_store": "healthy",
            "storage": "healthy",
        })
    );
}

#[tokio::test]
async fn test_health_is_503_when_a_store_is_down() {
    let app = setup_test_app().await;
    app.accounts.set_unavailable(true);

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert!(body["database"].as_str().unwrap().starts_with("unhealthy"));
    assert_eq!(body["document_store"], "healthy");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/game/7")
        .add_header(REQUEST_ID_HEADER, "trace-42")
        .await;

    assert_eq!(response.header(REQUEST_ID_HEADER), "trace-42");
}
