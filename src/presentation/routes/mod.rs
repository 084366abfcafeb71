// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::analytics_repo_impl::AnalyticsRepositoryImpl;
use crate::infrastructure::repositories::cleanup_repo_impl::CleanupRepositoryImpl;
use crate::infrastructure::repositories::scrape_task_repo_impl::ScrapeTaskRepositoryImpl;
use crate::presentation::handlers::{
    analytics_handler, cleanup_handler, listing_handler, scrape_task_handler,
};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use axum::{
    routing::{delete, get, patch, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
/// * `db` - 数据库连接池
/// * `api_key` - 受保护端点的共享密钥，None 时 fail-closed
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(db: Arc<DatabaseConnection>, api_key: Option<String>) -> Router {
    let task_repo = Arc::new(ScrapeTaskRepositoryImpl::new(db.clone()));
    let analytics_repo = Arc::new(AnalyticsRepositoryImpl::new(db.clone()));
    let cleanup_repo = Arc::new(CleanupRepositoryImpl::new(db));

    let auth_state = AuthState { api_key };

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let protected_routes = Router::new()
        .route(
            "/scrape_tasks",
            get(scrape_task_handler::list_scrape_tasks::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/scrape_tasks",
            post(scrape_task_handler::create_scrape_task::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/enums",
            get(scrape_task_handler::get_scrape_task_enums::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/next_pending",
            get(scrape_task_handler::next_pending_scrape_tasks::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/related/by_url",
            get(analytics_handler::related_by_url::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/related/by_url",
            delete(cleanup_handler::cleanup_related_by_url::<CleanupRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/summary/by_url",
            get(analytics_handler::summary_by_url::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/listing_snapshots/by_url_pattern",
            get(analytics_handler::listing_snapshots_by_url_pattern::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/{id}",
            get(scrape_task_handler::get_scrape_task::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/{id}",
            patch(scrape_task_handler::update_scrape_task::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/scrape_tasks/{id}",
            delete(scrape_task_handler::delete_scrape_task::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/analytics/scrape_tasks/pending_future",
            get(scrape_task_handler::pending_future_scrape_tasks::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/analytics/scrape_tasks/running",
            get(scrape_task_handler::running_scrape_tasks::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/analytics/scrape_tasks/failed",
            get(scrape_task_handler::failed_scrape_tasks::<ScrapeTaskRepositoryImpl>),
        )
        .route(
            "/analytics/scrape_tasks/recent",
            get(analytics_handler::recent_scrape_tasks::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/analytics/easylive/auctions",
            get(analytics_handler::easylive_auctions::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/analytics/easylive/auctioneer_lots",
            get(listing_handler::auctioneer_lots::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/analytics/auctioneers/prices",
            get(listing_handler::auctioneer_prices::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/listing_snapshots/by_catalogue",
            get(listing_handler::listings_by_catalogue::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/listings/by_auctioneer",
            get(listing_handler::listings_by_auctioneer::<AnalyticsRepositoryImpl>),
        )
        .route(
            "/listings/auctioneers",
            get(listing_handler::auctioneer_names::<AnalyticsRepositoryImpl>),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .layer(Extension(task_repo))
        .layer(Extension(analytics_repo))
        .layer(Extension(cleanup_repo));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
