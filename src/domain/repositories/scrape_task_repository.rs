// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_task::{
    NewScrapeTask, ScrapeTask, ScrapeTaskPatch, Site, TaskStatus, TaskType,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 任务列表查询参数
///
/// 时间字段各自提供精确匹配与 from/to 范围两种形式。
#[derive(Debug, Default, Clone)]
pub struct TaskListParams {
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub site: Option<Site>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub scheduled_at_from: Option<DateTime<FixedOffset>>,
    pub scheduled_at_to: Option<DateTime<FixedOffset>>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub created_at_from: Option<DateTime<FixedOffset>>,
    pub created_at_to: Option<DateTime<FixedOffset>>,
    pub limit: u64,
    pub offset: u64,
}

/// 抓取任务仓库特质
///
/// 定义 scrape_tasks 表的数据访问接口。列表类方法返回
/// (items, total)，total 为分页前的匹配总数。
#[async_trait]
pub trait ScrapeTaskRepository: Send + Sync {
    /// 按过滤条件分页列出任务
    async fn list(&self, params: &TaskListParams) -> Result<(Vec<ScrapeTask>, u64), RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: i64) -> Result<Option<ScrapeTask>, RepositoryError>;
    /// 创建新任务
    async fn create(&self, task: &NewScrapeTask) -> Result<ScrapeTask, RepositoryError>;
    /// 查找同一 (site, url, task_type, scheduled_at) 下仍处于 pending 的任务
    ///
    /// 读后写，无锁：并发创建可能双双通过检查（已知竞态，按原样保留）。
    async fn find_pending_duplicate(
        &self,
        task: &NewScrapeTask,
    ) -> Result<Option<ScrapeTask>, RepositoryError>;
    /// 部分更新任务，总是刷新 updated_at
    async fn update(&self, id: i64, patch: &ScrapeTaskPatch) -> Result<ScrapeTask, RepositoryError>;
    /// 删除任务（状态校验由调用方完成）
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
    /// 工作器认领查询：pending 且 (scheduled_at 为空或已到期)
    async fn next_pending(&self, limit: u64) -> Result<(Vec<ScrapeTask>, u64), RepositoryError>;
    /// 未到期的 pending 任务
    async fn pending_future(&self, limit: u64) -> Result<(Vec<ScrapeTask>, u64), RepositoryError>;
    /// 按状态列出任务，最近更新优先
    async fn list_by_status(
        &self,
        status: TaskStatus,
        task_type: Option<TaskType>,
        site: Option<Site>,
        limit: u64,
    ) -> Result<(Vec<ScrapeTask>, u64), RepositoryError>;
    /// 全表扫描 meta 中出现过的非空 auction_time 取值（去重）
    async fn distinct_auction_times(&self) -> Result<Vec<String>, RepositoryError>;
}
