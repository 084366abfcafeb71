// Copyright 2025 scrapetasks contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::analytics::{
    AuctioneerLots, AuctioneerPriceSummary, EasyliveAuctionRollup, ListingSnapshotDetail,
    ListingSnapshotGroup, RelatedUrlGroup, StatusSummary, TaskWithCounts,
};
use serde::Serialize;

/// Easylive 拍卖分析响应：状态汇总 + 拍卖维度明细
#[derive(Debug, Serialize)]
pub struct EasyliveAuctionsResponseDto {
    pub summary: StatusSummary,
    pub items: Vec<EasyliveAuctionRollup>,
}

/// 同前缀任务分组响应
#[derive(Debug, Serialize)]
pub struct RelatedByUrlResponseDto {
    pub total: u64,
    pub items: Vec<RelatedUrlGroup>,
}

/// 同前缀任务的 done/todo 分桶响应
#[derive(Debug, Serialize)]
pub struct UrlSummaryResponseDto {
    pub done_total: u64,
    pub todo_total: u64,
    pub done_items: Vec<TaskWithCounts>,
    pub todo_items: Vec<TaskWithCounts>,
}

/// 按拍品分组的快照响应
#[derive(Debug, Serialize)]
pub struct ListingSnapshotsByUrlPatternResponseDto {
    pub total: u64,
    pub total_listings: Option<u64>,
    /// 下一页偏移量，取尽后为 null
    pub next_offset: Option<u64>,
    pub items: Vec<ListingSnapshotGroup>,
}

/// 最近完成任务响应
#[derive(Debug, Serialize)]
pub struct RecentTasksResponseDto {
    pub total: u64,
    pub items: Vec<TaskWithCounts>,
}

/// 拍卖行价格汇总响应
#[derive(Debug, Serialize)]
pub struct AuctioneerPricesResponseDto {
    pub total: u64,
    pub items: Vec<AuctioneerPriceSummary>,
}

/// 拍卖行拍品计数响应
#[derive(Debug, Serialize)]
pub struct AuctioneerLotsResponseDto {
    pub total_lots: i64,
    pub items: Vec<AuctioneerLots>,
}

/// 拍品快照明细分页响应
///
/// total 与 next_offset 针对分页的明细行，total_listings 为去重拍品数。
#[derive(Debug, Serialize)]
pub struct ListingPageResponseDto {
    pub total: u64,
    pub total_listings: i64,
    pub avg_estimate_low: Option<f64>,
    pub avg_estimate_high: Option<f64>,
    pub avg_sold_price: Option<f64>,
    pub next_offset: Option<u64>,
    pub items: Vec<ListingSnapshotDetail>,
}

/// 拍卖行名称列表响应
#[derive(Debug, Serialize)]
pub struct AuctioneerNamesResponseDto {
    pub total: u64,
    pub items: Vec<String>,
}

/// 计算下一页偏移量，取尽后为 None
///
/// offset 来自未校验的查询参数，饱和相加避免越界。
pub fn next_offset(offset: u64, limit: u64, total: u64) -> Option<u64> {
    let next = offset.saturating_add(limit);
    if next < total {
        Some(next)
    } else {
        None
    }
}
