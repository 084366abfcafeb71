// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use chrono::{DateTime, FixedOffset, Utc};
use migration::{Migrator, MigratorTrait};
use scrapetasks::domain::models::scrape_task::{
    NewScrapeTask, ScrapeTask, Site, TaskStatus, TaskType,
};
use scrapetasks::domain::repositories::scrape_task_repository::ScrapeTaskRepository;
use scrapetasks::infrastructure::database::entities::{listing, listing_snapshot, listing_task_run, task_run};
use scrapetasks::infrastructure::repositories::scrape_task_repo_impl::ScrapeTaskRepositoryImpl;
use scrapetasks::presentation::routes;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::sync::Arc;

pub const TEST_API_KEY: &str = "test-api-key";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub task_repo: Arc<ScrapeTaskRepositoryImpl>,
}

/// 基于内存 SQLite 构建测试应用
pub async fn create_test_app() -> TestApp {
    create_test_app_with_key(Some(TEST_API_KEY.to_string())).await
}

/// 构建测试应用，密钥可缺省以覆盖 fail-closed 行为
pub async fn create_test_app_with_key(api_key: Option<String>) -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("Migrations failed");
    let db = Arc::new(db);

    let task_repo = Arc::new(ScrapeTaskRepositoryImpl::new(db.clone()));
    let app = routes::routes(db.clone(), api_key);
    let server = TestServer::new(app).expect("Failed to start test server");

    TestApp {
        server,
        db,
        task_repo,
    }
}

/// 直接通过仓库预置一条任务
#[allow(dead_code)]
pub async fn seed_task(
    app: &TestApp,
    site: Site,
    url: &str,
    task_type: TaskType,
    status: TaskStatus,
    scheduled_at: Option<DateTime<FixedOffset>>,
) -> ScrapeTask {
    app.task_repo
        .create(&NewScrapeTask {
            site,
            url: url.to_string(),
            task_type,
            status: Some(status),
            scheduled_at,
            locked_at: None,
            attempts: None,
            max_attempts: None,
            last_error: None,
            meta: None,
        })
        .await
        .expect("Failed to seed task")
}

/// 为任务预置一次运行记录
#[allow(dead_code)]
pub async fn seed_task_run(app: &TestApp, task_id: i64, url: &str) -> i64 {
    let now: DateTime<FixedOffset> = Utc::now().into();
    let run = task_run::ActiveModel {
        task_id: Set(task_id),
        url: Set(url.to_string()),
        auctioneer_name: Set(Some("Test Auction House".to_string())),
        stats: Set(serde_json::json!({"lots_found": 2})),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(app.db.as_ref())
    .await
    .expect("Failed to seed task run");
    run.id
}

/// 为运行记录预置一个带快照的拍品
#[allow(dead_code)]
pub async fn seed_listing_with_snapshot(app: &TestApp, task_run_id: i64) -> i64 {
    let now: DateTime<FixedOffset> = Utc::now().into();
    let listing = listing::ActiveModel {
        created_at: Set(now),
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

    listing_snapshot::ActiveModel {
        listing_id: Set(listing.id),
        snapshot_type: Set("pre_auction".to_string()),
        data: Set(serde_json::json!({"estimate_low": 10.0, "estimate_high": 20.0})),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(app.db.as_ref())
    .await
    .expect("Failed to seed listing snapshot");

    listing.id
}
