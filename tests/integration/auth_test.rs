// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{create_test_app, create_test_app_with_key, TEST_API_KEY};
use axum::http::StatusCode;

#[tokio::test]
async fn test_health_is_public() {
    let app = create_test_app().await;
    let response = app.server.get("/health").await;
    response.assert_status(StatusCode::OK);
    response.assert_text("OK");
}

#[tokio::test]
async fn test_version_is_public() {
    let app = create_test_app().await;
    let response = app.server.get("/v1/version").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_protected_route_without_key_is_unauthorized() {
    let app = create_test_app().await;
    let response = app.server.get("/scrape_tasks").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_protected_route_with_wrong_key_is_unauthorized() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/scrape_tasks")
        .add_header("X-API-Key", "wrong-key")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_key_succeeds() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/scrape_tasks")
        .add_header("X-API-Key", TEST_API_KEY)
        .await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_unconfigured_key_fails_closed() {
    let app = create_test_app_with_key(None).await;
    let response = app
        .server
        .get("/scrape_tasks")
        .add_header("X-API-Key", "anything")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    // public endpoints stay reachable
    let response = app.server.get("/health").await;
    response.assert_status(StatusCode::OK);
}
