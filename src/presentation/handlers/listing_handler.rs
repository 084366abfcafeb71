// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::analytics_requests::{AuctioneerQueryDto, CatalogueQueryDto};
use crate::application::dto::analytics_responses::{
    next_offset, AuctioneerLotsResponseDto, AuctioneerNamesResponseDto,
    AuctioneerPricesResponseDto, ListingPageResponseDto,
};
use crate::domain::models::analytics::ListingPage;
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

fn page_response(page: ListingPage, limit: u64, offset: u64) -> ListingPageResponseDto {
    ListingPageResponseDto {
        next_offset: next_offset(offset, limit, page.total),
        total: page.total,
        total_listings: page.total_listings,
        avg_estimate_low: page.avg_estimate_low,
        avg_estimate_high: page.avg_estimate_high,
        avg_sold_price: page.avg_sold_price,
        items: page.items,
    }
}

/// 单个目录 URL 下的拍品快照明细页
pub async fn listings_by_catalogue<A>(
    Extension(repo): Extension<Arc<A>>,
    Query(query): Query<CatalogueQueryDto>,
) -> Result<Json<ListingPageResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let page = repo.listings_by_catalogue(&query.url, limit, offset).await?;
    Ok(Json(page_response(page, limit, offset)))
}

/// 拍卖行名下的拍品快照明细页
pub async fn listings_by_auctioneer<A>(
    Extension(repo): Extension<Arc<A>>,
    Query(query): Query<AuctioneerQueryDto>,
) -> Result<Json<ListingPageResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let page = repo
        .listings_by_auctioneer(&query.name, limit, offset)
        .await?;
    Ok(Json(page_response(page, limit, offset)))
}

/// 去重后的拍卖行名称列表
pub async fn auctioneer_names<A>(
    Extension(repo): Extension<Arc<A>>,
) -> Result<Json<AuctioneerNamesResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    let items = repo.auctioneer_names().await?;
    Ok(Json(AuctioneerNamesResponseDto {
        total: items.len() as u64,
        items,
    }))
}

/// 拍卖行价格汇总
pub async fn auctioneer_prices<A>(
    Extension(repo): Extension<Arc<A>>,
) -> Result<Json<AuctioneerPricesResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    let items = repo.auctioneer_prices().await?;
    Ok(Json(AuctioneerPricesResponseDto {
        total: items.len() as u64,
        items,
    }))
}

/// 拍卖行拍品计数与最新快照时间
pub async fn auctioneer_lots<A>(
    Extension(repo): Extension<Arc<A>>,
) -> Result<Json<AuctioneerLotsResponseDto>, ApiError>
where
    A: AnalyticsRepository + 'static,
{
    let items = repo.auctioneer_lots().await?;
    let total_lots = items.iter().map(|row| row.distinct_lots).sum();
    Ok(Json(AuctioneerLotsResponseDto { total_lots, items }))
}
