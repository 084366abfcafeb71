// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::analytics_requests::{
    AnalyticsLimitQueryDto, UrlPatternQueryDto, UrlPrefixQueryDto,
};
use crate::application::dto::analytics_responses::{
    next_offset, EasyliveAuctionsResponseDto, ListingSnapshotsByUrlPatternResponseDto,
    RecentTasksResponseDto, RelatedByUrlResponseDto, UrlSummaryResponseDto,
};
use crate::domain::repositories::analytics_repository::AnalyticsRepository;
use crate::presentation::errors::ApiError;
use axum::{
    extract::{Extension, Query},
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 默认每页数量
const DEFAULT_LIMIT: u64 = 100;

/// Easylive 拍卖分析：状态汇总 + 拍卖维度明细
pub async fn easylive_auctions<A>(
    Extension(repo): Extension<Arc<A>>,
    Query(query): Query<AnalyticsLimitQueryDto>,
) -> Result<Json<EasyliveAuctionsResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let summary = repo.status_summary().await?;
    let items = repo
        .easylive_auction_rollup(query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(EasyliveAuctionsResponseDto { summary, items }))
}

/// 最近完成的任务及拍品计数
pub async fn recent_scrape_tasks<A>(
    Extension(repo): Extension<Arc<A>>,
    Query(query): Query<AnalyticsLimitQueryDto>,
) -> Result<Json<RecentTasksResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (items, total) = repo.recent_done(query.limit.unwrap_or(DEFAULT_LIMIT)).await?;
    Ok(Json(RecentTasksResponseDto { total, items }))
}

/// 同前缀任务按 (url, task_type, status, meta.source) 分组
pub async fn related_by_url<A>(
    Extension(repo): Extension<Arc<A>>,
    Query(query): Query<UrlPrefixQueryDto>,
) -> Result<Json<RelatedByUrlResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    let items = repo.related_by_url(&query.url_prefix).await?;
    Ok(Json(RelatedByUrlResponseDto {
        total: items.len() as u64,
        items,
    }))
}

/// 同前缀任务的 done/todo 分桶
pub async fn summary_by_url<A>(
    Extension(repo): Extension<Arc<A>>,
    Query(query): Query<UrlPrefixQueryDto>,
) -> Result<Json<UrlSummaryResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    let tasks = repo.summary_by_url(&query.url_prefix).await?;
    let (done_items, todo_items): (Vec<_>, Vec<_>) =
        tasks.into_iter().partition(|task| task.status == "done");
    Ok(Json(UrlSummaryResponseDto {
        done_total: done_items.len() as u64,
        todo_total: todo_items.len() as u64,
        done_items,
        todo_items,
    }))
}

/// 按拍品分组的快照汇总，带分页
pub async fn listing_snapshots_by_url_pattern<A>(
    Extension(repo): Extension<Arc<A>>,
    Query(query): Query<UrlPatternQueryDto>,
) -> Result<Json<ListingSnapshotsByUrlPatternResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let (items, total) = repo
        .listing_snapshots_by_url_pattern(&query.url_pattern, limit, offset)
        .await?;
    Ok(Json(ListingSnapshotsByUrlPatternResponseDto {
        total,
        total_listings: Some(total),
        next_offset: next_offset(offset, limit, total),
        items,
    }))
}
