// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use sea_orm::FromQueryResult;
use serde::Serialize;

/// 任务状态汇总
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub total: i64,
    pub pending: i64,
    pub running: i64,
    pub done: i64,
    pub failed: i64,
}

/// Easylive 拍卖目录抓取汇总行
///
/// catalogue_id/auction_id/slug 由 task_run URL 中 `catalogue/`
/// 之后的路径段解析得到。
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct EasyliveAuctionRollup {
    pub auctioneer_name: Option<String>,
    pub catalogue_id: String,
    pub auction_id: String,
    pub slug: Option<String>,
    pub run_count: i64,
    pub lots_scraped: Option<i64>,
    pub hammer_prices_found: Option<i64>,
}

/// 共享 URL 前缀的任务分组
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct RelatedUrlGroup {
    pub url: String,
    pub task_type: String,
    pub status: String,
    pub source: Option<String>,
    pub task_count: i64,
    pub listing_count: i64,
    pub latest_created_at: Option<DateTime<FixedOffset>>,
    pub latest_updated_at: Option<DateTime<FixedOffset>>,
}

/// 带拍品/快照计数的任务行
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct TaskWithCounts {
    pub id: i64,
    pub site: String,
    pub url: String,
    pub task_type: String,
    pub status: String,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub locked_at: Option<DateTime<FixedOffset>>,
    pub attempts: i32,
    pub max_attempts: i32,
    pub last_error: Option<String>,
    pub meta: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub listing_count: i64,
    pub snapshot_count: i64,
}

/// 按拍品分组的快照汇总行
///
/// 字段取自该拍品最近一次快照的 data。
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ListingSnapshotGroup {
    pub listing_id: i64,
    pub auction_start: Option<String>,
    pub auction_end: Option<String>,
    pub estimate_low: Option<f64>,
    pub estimate_high: Option<f64>,
    pub sold_price: Option<f64>,
    pub pre_auction_count: i64,
    pub post_auction_count: i64,
    pub snapshot_count: i64,
    pub latest_snapshot_at: Option<DateTime<FixedOffset>>,
}

/// 拍卖行价格汇总
///
/// 均值在连接后的快照行上计算，lots_analysed 为去重拍品数。
/// 上游未去重时同一拍品可能被重复计入均值，保持原有口径。
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct AuctioneerPriceSummary {
    pub auctioneer_name: Option<String>,
    pub lots_analysed: i64,
    pub est_lo: Option<f64>,
    pub est_hi: Option<f64>,
    pub sold: Option<f64>,
}

/// 拍卖行拍品计数
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct AuctioneerLots {
    pub auctioneer_name: Option<String>,
    pub distinct_lots: i64,
    pub latest_snapshot_created_at: Option<DateTime<FixedOffset>>,
}

/// 拍品快照明细行（分页端点使用）
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ListingSnapshotDetail {
    pub listing_id: i64,
    pub auctioneer_name: Option<String>,
    pub snapshot_type: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
}

/// 拍品快照分页结果及全量均值
///
/// total 统计的是分页所作用的快照明细行，total_listings 为去重拍品数。
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub total: u64,
    pub total_listings: i64,
    pub avg_estimate_low: Option<f64>,
    pub avg_estimate_high: Option<f64>,
    pub avg_sold_price: Option<f64>,
    pub items: Vec<ListingSnapshotDetail>,
}

/// 级联清理结果
///
/// dry_run 时各计数为 0，只回报命中的任务 id。
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub task_ids: Vec<i64>,
    pub task_runs_deleted: u64,
    pub listing_task_runs_deleted: u64,
    pub listings_deleted: u64,
    pub listing_snapshots_deleted: u64,
}
