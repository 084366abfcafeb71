// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{create_test_app, seed_task, TestApp, TEST_API_KEY};
use axum::http::StatusCode;
use axum_test::TestResponse;
use chrono::{Duration, Utc};
use scrapetasks::domain::models::scrape_task::{Site, TaskStatus, TaskType};
use serde_json::{json, Value};

async fn get(app: &TestApp, path: &str) -> TestResponse {
    app.server.get(path).add_header("X-API-Key", TEST_API_KEY).await
}

async fn post(app: &TestApp, path: &str, body: &Value) -> TestResponse {
    app.server
        .post(path)
        .add_header("X-API-Key", TEST_API_KEY)
        .json(body)
        .await
}

async fn patch(app: &TestApp, path: &str, body: &Value) -> TestResponse {
    app.server
        .patch(path)
        .add_header("X-API-Key", TEST_API_KEY)
        .json(body)
        .await
}

async fn delete(app: &TestApp, path: &str) -> TestResponse {
    app.server
        .delete(path)
        .add_header("X-API-Key", TEST_API_KEY)
        .await
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let app = create_test_app().await;
    let response = post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "easylive",
            "url": "https://www.easyliveauction.com/catalogue/123",
            "task_type": "catalogue"
        }),
    )
    .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["attempts"], 0);
    assert_eq!(body["max_attempts"], 5);
    assert_eq!(body["meta"], json!({}));
    assert!(body["scheduled_at"].is_null());
    assert!(body["locked_at"].is_null());
    assert!(body["last_error"].is_null());
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_create_null_meta_becomes_empty_object() {
    let app = create_test_app().await;
    let response = post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "easylive",
            "url": "https://example.com/a",
            "task_type": "discover",
            "meta": null
        }),
    )
    .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["meta"], json!({}));
}

#[tokio::test]
async fn test_create_duplicate_pending_is_conflict() {
    let app = create_test_app().await;
    let task = json!({
        "site": "the_saleroom",
        "url": "https://www.the-saleroom.com/catalogue/9",
        "task_type": "listing"
    });

    let first = post(&app, "/scrape_tasks", &task).await;
    first.assert_status(StatusCode::CREATED);
    let first_body: Value = first.json();

    let second = post(&app, "/scrape_tasks", &task).await;
    second.assert_status(StatusCode::CONFLICT);
    let body: Value = second.json();
    assert_eq!(body["existing_id"], first_body["id"]);
    assert!(body["detail"].is_string());

    // a different scheduled_at is a different claim slot
    let mut scheduled = task.clone();
    scheduled["scheduled_at"] = json!("2030-01-01T00:00:00Z");
    let third = post(&app, "/scrape_tasks", &scheduled).await;
    third.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_check_ignores_non_pending_tasks() {
    let app = create_test_app().await;
    seed_task(
        &app,
        Site::Easylive,
        "https://example.com/done",
        TaskType::Discover,
        TaskStatus::Done,
        None,
    )
    .await;

    let response = post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "easylive",
            "url": "https://example.com/done",
            "task_type": "discover"
        }),
    )
    .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_get_task_by_id() {
    let app = create_test_app().await;
    let task = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/a",
        TaskType::Discover,
        TaskStatus::Pending,
        None,
    )
    .await;

    let response = get(&app, &format!("/scrape_tasks/{}", task.id)).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"].as_i64(), Some(task.id));
    assert_eq!(body["url"], "https://example.com/a");

    let missing = get(&app, "/scrape_tasks/999999").await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = create_test_app().await;
    for i in 0..3 {
        seed_task(
            &app,
            Site::Easylive,
            &format!("https://example.com/{}", i),
            TaskType::Discover,
            TaskStatus::Pending,
            None,
        )
        .await;
    }
    seed_task(
        &app,
        Site::TheSaleroom,
        "https://example.com/other",
        TaskType::Listing,
        TaskStatus::Done,
        None,
    )
    .await;

    let response = get(&app, "/scrape_tasks?site=easylive").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    // total counts matches before pagination
    let response = get(&app, "/scrape_tasks?site=easylive&limit=2&offset=2").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let response = get(&app, "/scrape_tasks?status=done").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["site"], "the_saleroom");
}

#[tokio::test]
async fn test_list_rejects_invalid_parameters() {
    let app = create_test_app().await;

    let response = get(&app, "/scrape_tasks?limit=0").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = get(&app, "/scrape_tasks?limit=1001").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = get(&app, "/scrape_tasks?status=bogus").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_updates_fields_and_touches_updated_at() {
    let app = create_test_app().await;
    let task = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/a",
        TaskType::Discover,
        TaskStatus::Pending,
        None,
    )
    .await;

    let response = patch(
        &app,
        &format!("/scrape_tasks/{}", task.id),
        &json!({"status": "running", "attempts": 1}),
    )
    .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["attempts"], 1);
    assert_eq!(body["url"], "https://example.com/a");

    let updated_at = body["updated_at"].as_str().unwrap();
    let created_at = body["created_at"].as_str().unwrap();
    assert!(updated_at >= created_at);

    let missing = patch(&app, "/scrape_tasks/999999", &json!({"status": "done"})).await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_null_meta_is_ignored() {
    let app = create_test_app().await;
    let created = post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "easylive",
            "url": "https://example.com/meta",
            "task_type": "discover",
            "meta": {"auction_time": "morning"}
        }),
    )
    .await;
    let created_body: Value = created.json();
    let id = created_body["id"].as_i64().unwrap();

    let response = patch(&app, &format!("/scrape_tasks/{}", id), &json!({"meta": null})).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["meta"], json!({"auction_time": "morning"}));

    // a concrete object replaces meta wholesale
    let response = patch(
        &app,
        &format!("/scrape_tasks/{}", id),
        &json!({"meta": {"source": "manual"}}),
    )
    .await;
    let body: Value = response.json();
    assert_eq!(body["meta"], json!({"source": "manual"}));
}

#[tokio::test]
async fn test_patch_explicit_null_clears_nullable_columns() {
    let app = create_test_app().await;
    let created = post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "easylive",
            "url": "https://example.com/sched",
            "task_type": "discover",
            "scheduled_at": "2030-01-01T00:00:00Z",
            "last_error": "previous failure"
        }),
    )
    .await;
    let created_body: Value = created.json();
    let id = created_body["id"].as_i64().unwrap();
    assert!(created_body["scheduled_at"].is_string());

    // absent fields stay untouched
    let response = patch(&app, &format!("/scrape_tasks/{}", id), &json!({"attempts": 2})).await;
    let body: Value = response.json();
    assert!(body["scheduled_at"].is_string());
    assert_eq!(body["last_error"], "previous failure");

    // explicit null clears the column
    let response = patch(
        &app,
        &format!("/scrape_tasks/{}", id),
        &json!({"scheduled_at": null, "last_error": null}),
    )
    .await;
    let body: Value = response.json();
    assert!(body["scheduled_at"].is_null());
    assert!(body["last_error"].is_null());
}

#[tokio::test]
async fn test_delete_only_pending_or_failed() {
    let app = create_test_app().await;
    let pending = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/p",
        TaskType::Discover,
        TaskStatus::Pending,
        None,
    )
    .await;
    let failed = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/f",
        TaskType::Discover,
        TaskStatus::Failed,
        None,
    )
    .await;
    let running = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/r",
        TaskType::Discover,
        TaskStatus::Running,
        None,
    )
    .await;

    let response = delete(&app, &format!("/scrape_tasks/{}", pending.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
    let gone = get(&app, &format!("/scrape_tasks/{}", pending.id)).await;
    gone.assert_status(StatusCode::NOT_FOUND);

    let response = delete(&app, &format!("/scrape_tasks/{}", failed.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = delete(&app, &format!("/scrape_tasks/{}", running.id)).await;
    response.assert_status(StatusCode::CONFLICT);
    let still_there = get(&app, &format!("/scrape_tasks/{}", running.id)).await;
    still_there.assert_status(StatusCode::OK);

    let response = delete(&app, "/scrape_tasks/999999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_next_pending_and_pending_future_are_disjoint() {
    let app = create_test_app().await;
    let now = Utc::now();

    let unscheduled = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/unscheduled",
        TaskType::Discover,
        TaskStatus::Pending,
        None,
    )
    .await;
    let due = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/due",
        TaskType::Discover,
        TaskStatus::Pending,
        Some((now - Duration::hours(1)).into()),
    )
    .await;
    let future = seed_task(
        &app,
        Site::Easylive,
        "https://example.com/future",
        TaskType::Discover,
        TaskStatus::Pending,
        Some((now + Duration::hours(1)).into()),
    )
    .await;
    // non-pending tasks never surface in either endpoint
    seed_task(
        &app,
        Site::Easylive,
        "https://example.com/busy",
        TaskType::Discover,
        TaskStatus::Running,
        None,
    )
    .await;

    let response = get(&app, "/scrape_tasks/next_pending").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    let ids: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    // due tasks first in scheduled order, unscheduled last
    assert_eq!(ids, vec![due.id, unscheduled.id]);

    let response = get(&app, "/analytics/scrape_tasks/pending_future").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"].as_i64(), Some(future.id));
}

#[tokio::test]
async fn test_enums_endpoint_lists_values_and_auction_times() {
    let app = create_test_app().await;
    post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "easylive",
            "url": "https://example.com/t1",
            "task_type": "auction_times",
            "meta": {"auction_time": "2030-05-01T10:00:00Z"}
        }),
    )
    .await;
    post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "easylive",
            "url": "https://example.com/t2",
            "task_type": "auction_times",
            "meta": {"auction_time": "2030-05-01T10:00:00Z"}
        }),
    )
    .await;

    let response = get(&app, "/scrape_tasks/enums").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["site"], json!(["easylive", "the_saleroom"]));
    assert_eq!(
        body["task_type"],
        json!(["discover", "listing", "rescrape", "catalogue", "auction_times"])
    );
    assert_eq!(body["status"], json!(["pending", "running", "done", "failed"]));
    // values are deduplicated
    assert_eq!(body["auction_times"], json!(["2030-05-01T10:00:00Z"]));
}

#[tokio::test]
async fn test_running_and_failed_status_lists() {
    let app = create_test_app().await;
    seed_task(
        &app,
        Site::Easylive,
        "https://example.com/r",
        TaskType::Catalogue,
        TaskStatus::Running,
        None,
    )
    .await;
    post(
        &app,
        "/scrape_tasks",
        &json!({
            "site": "the_saleroom",
            "url": "https://example.com/f",
            "task_type": "listing",
            "status": "failed",
            "last_error": "timeout fetching page"
        }),
    )
    .await;

    let response = get(&app, "/analytics/scrape_tasks/running").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["task_type"], "catalogue");

    let response = get(&app, "/analytics/scrape_tasks/failed").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["failure_reason"], "timeout fetching page");

    // site filter applies
    let response = get(&app, "/analytics/scrape_tasks/failed?site=easylive").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 0);
}
