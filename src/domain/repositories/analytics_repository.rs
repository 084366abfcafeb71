// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analytics::{
    AuctioneerLots, AuctioneerPriceSummary, EasyliveAuctionRollup, ListingPage,
    ListingSnapshotGroup, RelatedUrlGroup, StatusSummary, TaskWithCounts,
};
use crate::domain::repositories::scrape_task_repository::RepositoryError;
use async_trait::async_trait;

/// 分析查询仓库特质
///
/// 每个方法对应一条只读聚合 SQL，无副作用，相互独立。
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// 各状态任务计数
    async fn status_summary(&self) -> Result<StatusSummary, RepositoryError>;
    /// Easylive 目录任务的拍卖维度汇总
    async fn easylive_auction_rollup(
        &self,
        limit: u64,
    ) -> Result<Vec<EasyliveAuctionRollup>, RepositoryError>;
    /// 按 (url, task_type, status, meta.source) 分组的同前缀任务
    async fn related_by_url(&self, url_prefix: &str)
        -> Result<Vec<RelatedUrlGroup>, RepositoryError>;
    /// 同前缀任务及其拍品/快照计数（done 与否由调用方分桶）
    async fn summary_by_url(&self, url_prefix: &str)
        -> Result<Vec<TaskWithCounts>, RepositoryError>;
    /// 按拍品分组的快照汇总，带分页
    ///
    /// 返回 (rows, 分页前的分组总数)。
    async fn listing_snapshots_by_url_pattern(
        &self,
        url_pattern: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ListingSnapshotGroup>, u64), RepositoryError>;
    /// 最近完成的任务及拍品计数
    ///
    /// 返回 (rows, 截断前的 done 任务总数)。
    async fn recent_done(&self, limit: u64)
        -> Result<(Vec<TaskWithCounts>, u64), RepositoryError>;
    /// 拍卖行价格汇总
    async fn auctioneer_prices(&self) -> Result<Vec<AuctioneerPriceSummary>, RepositoryError>;
    /// 拍卖行拍品计数与最新快照时间
    async fn auctioneer_lots(&self) -> Result<Vec<AuctioneerLots>, RepositoryError>;
    /// 目录 URL 下的拍品快照明细页
    async fn listings_by_catalogue(
        &self,
        url: &str,
        limit: u64,
        offset: u64,
    ) -> Result<ListingPage, RepositoryError>;
    /// 拍卖行名下的拍品快照明细页
    async fn listings_by_auctioneer(
        &self,
        name: &str,
        limit: u64,
        offset: u64,
    ) -> Result<ListingPage, RepositoryError>;
    /// 去重后的拍卖行名称列表
    async fn auctioneer_names(&self) -> Result<Vec<String>, RepositoryError>;
}
