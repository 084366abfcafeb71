// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::analytics_requests::CleanupQueryDto;
use crate::application::dto::scrape_task_responses::CleanupResponseDto;
use crate::domain::repositories::cleanup_repository::CleanupRepository;
use crate::presentation::errors::ApiError;
use axum::{
    extract::{Extension, Query},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// 级联清理命中 URL 前缀的 catalogue 任务产出
///
/// 无命中返回 404。dry_run 只记录并返回命中的任务 id，不做
/// 任何删除；真实执行在单事务内清空四张产出表中属于这些任务
/// 的行，scrape_tasks 行保持不动。
pub async fn cleanup_related_by_url<C>(
    Extension(repo): Extension<Arc<C>>,
    Query(query): Query<CleanupQueryDto>,
) -> Result<Json<CleanupResponseDto>, ApiError>
where
    C: CleanupRepository + 'static,
{
    let task_ids = repo.find_catalogue_task_ids(&query.url_prefix).await?;
    if task_ids.is_empty() {
        return Err(ApiError::NotFound);
    }

    let dry_run = query.dry_run.unwrap_or(false);
    if dry_run {
        info!(
            url_prefix = %query.url_prefix,
            task_ids = ?task_ids,
            "Dry run: would purge scraper output for {} catalogue task(s)",
            task_ids.len()
        );
        return Ok(Json(CleanupResponseDto {
            dry_run: true,
            task_ids,
            task_runs_deleted: 0,
            listing_task_runs_deleted: 0,
            listings_deleted: 0,
            listing_snapshots_deleted: 0,
        }));
    }

    warn!(
        url_prefix = %query.url_prefix,
        task_ids = ?task_ids,
        "Purging scraper output for {} catalogue task(s)",
        task_ids.len()
    );
    let report = repo.purge_task_output(&task_ids).await?;
    info!(
        task_runs = report.task_runs_deleted,
        listing_task_runs = report.listing_task_runs_deleted,
        listings = report.listings_deleted,
        listing_snapshots = report.listing_snapshots_deleted,
        "Scraper output purged"
    );

    Ok(Json(CleanupResponseDto {
        dry_run: false,
        task_ids: report.task_ids,
        task_runs_deleted: report.task_runs_deleted,
        listing_task_runs_deleted: report.listing_task_runs_deleted,
        listings_deleted: report.listings_deleted,
        listing_snapshots_deleted: report.listing_snapshots_deleted,
    }))
}
