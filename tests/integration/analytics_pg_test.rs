// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Postgres 后端的分析端点测试
//!
//! 聚合 SQL 是 Postgres 方言，内存 SQLite 跑不了。这些测试默认
//! ignored，需要 SCRAPETASKS__DATABASE__URL 指向一个可建库的
//! Postgres 服务（13+）后用 --ignored 运行。每个测试使用独立的
//! 数据库，互不干扰。

use crate::helpers::TEST_API_KEY;
use axum_test::{TestResponse, TestServer};
use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use scrapetasks::domain::models::scrape_task::{
    NewScrapeTask, ScrapeTask, Site, TaskStatus, TaskType,
};
use scrapetasks::domain::repositories::scrape_task_repository::ScrapeTaskRepository;
use scrapetasks::infrastructure::database::entities::{
    listing, listing_snapshot, listing_task_run, task_run,
};
use scrapetasks::infrastructure::repositories::scrape_task_repo_impl::ScrapeTaskRepositoryImpl;
use scrapetasks::presentation::routes;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
use serde_json::{json, Value};
use std::sync::Arc;

const PG_URL_VAR: &str = "SCRAPETASKS__DATABASE__URL";

struct PgApp {
    server: TestServer,
    db: Arc<DatabaseConnection>,
    task_repo: Arc<ScrapeTaskRepositoryImpl>,
}

/// 在配置的 Postgres 服务上重建一个专属测试库并启动应用
async fn create_pg_app(db_suffix: &str) -> PgApp {
    let admin_url = std::env::var(PG_URL_VAR)
        .unwrap_or_else(|_| panic!("{PG_URL_VAR} must point at a Postgres server"));
    let admin = Database::connect(&admin_url)
        .await
        .expect("Failed to connect to Postgres");

    let name = format!("scrapetasks_test_{db_suffix}");
    admin
        .execute_unprepared(&format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#))
        .await
        .expect("Failed to drop stale test database");
    admin
        .execute_unprepared(&format!(r#"CREATE DATABASE "{name}""#))
        .await
        .expect("Failed to create test database");

    let (base, _) = admin_url
        .rsplit_once('/')
        .expect("database url must contain a database path");
    let db = Database::connect(format!("{base}/{name}"))
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None).await.expect("Migrations failed");
    let db = Arc::new(db);

    let task_repo = Arc::new(ScrapeTaskRepositoryImpl::new(db.clone()));
    let app = routes::routes(db.clone(), Some(TEST_API_KEY.to_string()));
    let server = TestServer::new(app).expect("Failed to start test server");

    PgApp {
        server,
        db,
        task_repo,
    }
}

async fn get(app: &PgApp, path: &str, query: &[(&str, &str)]) -> TestResponse {
    let mut request = app.server.get(path).add_header("X-API-Key", TEST_API_KEY);
    for (key, value) in query {
        request = request.add_query_param(key, value);
    }
    request.await
}

async fn seed_task(
    app: &PgApp,
    site: Site,
    url: &str,
    task_type: TaskType,
    status: TaskStatus,
) -> ScrapeTask {
    app.task_repo
        .create(&NewScrapeTask {
            site,
            url: url.to_string(),
            task_type,
            status: Some(status),
            scheduled_at: None,
            locked_at: None,
            attempts: None,
            max_attempts: None,
            last_error: None,
            meta: None,
        })
        .await
        .expect("Failed to seed task")
}

async fn seed_run(
    app: &PgApp,
    task_id: i64,
    url: &str,
    auctioneer: &str,
    stats: Value,
) -> i64 {
    let run = task_run::ActiveModel {
        task_id: Set(task_id),
        url: Set(url.to_string()),
        auctioneer_name: Set(Some(auctioneer.to_string())),
        stats: Set(stats),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(app.db.as_ref())
    .await
    .expect("Failed to seed task run");
    run.id
}

async fn seed_listing(app: &PgApp, task_run_id: i64) -> i64 {
    let listing = listing::ActiveModel {
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(app.db.as_ref())
    .await
    .expect("Failed to seed listing");

    listing_task_run::ActiveModel {
        task_run_id: Set(task_run_id),
        listing_id: Set(listing.id),
    }
    .insert(app.db.as_ref())
    .await
    .expect("Failed to seed listing task run");

    listing.id
}

async fn seed_snapshot(
    app: &PgApp,
    listing_id: i64,
    snapshot_type: &str,
    data: Value,
    age_minutes: i64,
) {
    listing_snapshot::ActiveModel {
        listing_id: Set(listing_id),
        snapshot_type: Set(snapshot_type.to_string()),
        data: Set(data),
        created_at: Set((Utc::now() - Duration::minutes(age_minutes)).into()),
        ..Default::default()
    }
    .insert(app.db.as_ref())
    .await
    .expect("Failed to seed listing snapshot");
}

#[tokio::test]
#[ignore = "requires Postgres via SCRAPETASKS__DATABASE__URL"]
async fn test_easylive_rollup_parses_catalogue_urls() {
    let app = create_pg_app("rollup").await;
    let task = seed_task(
        &app,
        Site::Easylive,
        "https://www.easyliveauction.com/catalogue/123/456/spring-sale",
        TaskType::Catalogue,
        TaskStatus::Done,
    )
    .await;
    // Two runs of the same catalogue, one carrying a query string
    seed_run(
        &app,
        task.id,
        "https://www.easyliveauction.com/catalogue/123/456/spring-sale?page=2",
        "Harrison & Co",
        json!({"lots_found": 40, "hammer_prices_found": 12}),
    )
    .await;
    seed_run(
        &app,
        task.id,
        "https://www.easyliveauction.com/catalogue/123/456/spring-sale",
        "Harrison & Co",
        json!({"lots_found": 2, "hammer_prices_found": 1}),
    )
    .await;
    // A catalogue URL with no trailing slug
    seed_run(
        &app,
        task.id,
        "https://www.easyliveauction.com/catalogue/789/900",
        "Harrison & Co",
        json!({"lots_found": 5, "hammer_prices_found": 0}),
    )
    .await;

    let response = get(&app, "/analytics/easylive/auctions", &[]).await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["summary"]["total"], 1);
    assert_eq!(body["summary"]["done"], 1);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    let spring = items
        .iter()
        .find(|item| item["catalogue_id"] == "123")
        .expect("rollup row for catalogue 123");
    assert_eq!(spring["auction_id"], "456");
    assert_eq!(spring["slug"], "spring-sale");
    assert_eq!(spring["run_count"], 2);
    assert_eq!(spring["lots_scraped"], 42);
    assert_eq!(spring["hammer_prices_found"], 13);

    let slugless = items
        .iter()
        .find(|item| item["catalogue_id"] == "789")
        .expect("rollup row for catalogue 789");
    assert_eq!(slugless["auction_id"], "900");
    assert!(slugless["slug"].is_null());
}

#[tokio::test]
#[ignore = "requires Postgres via SCRAPETASKS__DATABASE__URL"]
async fn test_related_and_summary_by_url_group_matching_tasks() {
    let app = create_pg_app("by_url").await;
    let prefix = "https://www.easyliveauction.com/catalogue/777";

    let done = seed_task(&app, Site::Easylive, prefix, TaskType::Catalogue, TaskStatus::Done).await;
    let run = seed_run(&app, done.id, prefix, "Harrison & Co", json!({"lots_found": 2})).await;
    for _ in 0..2 {
        let listing_id = seed_listing(&app, run).await;
        seed_snapshot(&app, listing_id, "pre_auction", json!({"estimate_low": 10.0}), 0).await;
    }
    seed_task(
        &app,
        Site::Easylive,
        &format!("{prefix}/lot/1"),
        TaskType::Listing,
        TaskStatus::Pending,
    )
    .await;
    // Outside the prefix, must not appear
    seed_task(
        &app,
        Site::Easylive,
        "https://www.easyliveauction.com/catalogue/888",
        TaskType::Catalogue,
        TaskStatus::Done,
    )
    .await;

    let response = get(
        &app,
        "/scrape_tasks/related/by_url",
        &[("url_prefix", prefix)],
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    let catalogue_group = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|group| group["task_type"] == "catalogue")
        .expect("catalogue group");
    assert_eq!(catalogue_group["task_count"], 1);
    assert_eq!(catalogue_group["listing_count"], 2);

    let response = get(
        &app,
        "/scrape_tasks/summary/by_url",
        &[("url_prefix", prefix)],
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["done_total"], 1);
    assert_eq!(body["todo_total"], 1);
    assert_eq!(body["done_items"][0]["listing_count"], 2);
    assert_eq!(body["done_items"][0]["snapshot_count"], 2);
    assert_eq!(body["todo_items"][0]["status"], "pending");
}

#[tokio::test]
#[ignore = "requires Postgres via SCRAPETASKS__DATABASE__URL"]
async fn test_listing_page_total_counts_rows_before_pagination() {
    let app = create_pg_app("listing_page").await;
    let url = "https://www.easyliveauction.com/catalogue/123/456/sale";
    let task = seed_task(&app, Site::Easylive, url, TaskType::Catalogue, TaskStatus::Done).await;
    let run = seed_run(&app, task.id, url, "Harrison & Co", json!({"lots_found": 2})).await;
    // Two listings with two snapshots each: four detail rows
    let mut estimate = 10.0;
    for _ in 0..2 {
        let listing_id = seed_listing(&app, run).await;
        seed_snapshot(
            &app,
            listing_id,
            "pre_auction",
            json!({"estimate_low": estimate}),
            10,
        )
        .await;
        seed_snapshot(
            &app,
            listing_id,
            "post_auction",
            json!({"estimate_low": estimate + 10.0}),
            0,
        )
        .await;
        estimate += 20.0;
    }

    let response = get(
        &app,
        "/listing_snapshots/by_catalogue",
        &[("url", url), ("limit", "3")],
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["total_listings"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["next_offset"], 3);
    assert_eq!(body["avg_estimate_low"].as_f64(), Some(25.0));

    // Last page drains the remaining row and stops advancing
    let response = get(
        &app,
        "/listing_snapshots/by_catalogue",
        &[("url", url), ("limit", "3"), ("offset", "3")],
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert!(body["next_offset"].is_null());

    // Same arithmetic through the auctioneer variant
    let response = get(
        &app,
        "/listings/by_auctioneer",
        &[("name", "Harrison & Co"), ("limit", "3")],
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["total_listings"], 2);
    assert_eq!(body["next_offset"], 3);
}

#[tokio::test]
#[ignore = "requires Postgres via SCRAPETASKS__DATABASE__URL"]
async fn test_recent_tasks_total_counts_done_before_limit() {
    let app = create_pg_app("recent").await;
    for i in 0..3 {
        seed_task(
            &app,
            Site::Easylive,
            &format!("https://www.easyliveauction.com/catalogue/{i}"),
            TaskType::Catalogue,
            TaskStatus::Done,
        )
        .await;
    }
    seed_task(
        &app,
        Site::Easylive,
        "https://www.easyliveauction.com/catalogue/pending",
        TaskType::Catalogue,
        TaskStatus::Pending,
    )
    .await;

    let response = get(&app, "/analytics/scrape_tasks/recent", &[("limit", "2")]).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires Postgres via SCRAPETASKS__DATABASE__URL"]
async fn test_url_pattern_groups_take_fields_from_latest_snapshot() {
    let app = create_pg_app("url_pattern").await;
    let url = "https://www.easyliveauction.com/catalogue/321/654/autumn";
    let task = seed_task(&app, Site::Easylive, url, TaskType::Catalogue, TaskStatus::Done).await;
    let run = seed_run(&app, task.id, url, "Harrison & Co", json!({"lots_found": 1})).await;
    let listing_id = seed_listing(&app, run).await;
    seed_snapshot(
        &app,
        listing_id,
        "pre_auction",
        json!({"estimate_low": 10.0, "estimate_high": 20.0}),
        60,
    )
    .await;
    seed_snapshot(&app, listing_id, "post_auction", json!({"sold_price": 55.0}), 0).await;

    let response = get(
        &app,
        "/scrape_tasks/listing_snapshots/by_url_pattern",
        &[("url_pattern", "https://www.easyliveauction.com/catalogue/321%")],
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert!(body["next_offset"].is_null());

    let group = &body["items"][0];
    assert_eq!(group["listing_id"], listing_id);
    assert_eq!(group["pre_auction_count"], 1);
    assert_eq!(group["post_auction_count"], 1);
    assert_eq!(group["snapshot_count"], 2);
    // Fields come from the newest snapshot only
    assert_eq!(group["sold_price"].as_f64(), Some(55.0));
    assert!(group["estimate_low"].is_null());
}

#[tokio::test]
#[ignore = "requires Postgres via SCRAPETASKS__DATABASE__URL"]
async fn test_auctioneer_reports_aggregate_per_auctioneer() {
    let app = create_pg_app("auctioneers").await;
    let url = "https://www.easyliveauction.com/catalogue/42/43/winter";
    let task = seed_task(&app, Site::Easylive, url, TaskType::Catalogue, TaskStatus::Done).await;

    let first = seed_run(&app, task.id, url, "Harrison & Co", json!({"lots_found": 2})).await;
    for _ in 0..2 {
        let listing_id = seed_listing(&app, first).await;
        seed_snapshot(&app, listing_id, "post_auction", json!({"sold_price": 100.0}), 0).await;
    }
    let second = seed_run(&app, task.id, url, "Albany Rooms", json!({"lots_found": 1})).await;
    let listing_id = seed_listing(&app, second).await;
    seed_snapshot(&app, listing_id, "post_auction", json!({"sold_price": 30.0}), 0).await;

    let response = get(&app, "/listings/auctioneers", &[]).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"], json!(["Albany Rooms", "Harrison & Co"]));

    let response = get(&app, "/analytics/auctioneers/prices", &[]).await;
    response.assert_status_ok();
    let body: Value = response.json();
    let harrison = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["auctioneer_name"] == "Harrison & Co")
        .expect("price row for Harrison & Co");
    assert_eq!(harrison["lots_analysed"], 2);
    assert_eq!(harrison["sold"].as_f64(), Some(100.0));

    let response = get(&app, "/analytics/easylive/auctioneer_lots", &[]).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_lots"], 3);
    let albany = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["auctioneer_name"] == "Albany Rooms")
        .expect("lots row for Albany Rooms");
    assert_eq!(albany["distinct_lots"], 1);
}
