// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analytics::CleanupReport;
use crate::domain::repositories::scrape_task_repository::RepositoryError;
use async_trait::async_trait;

/// 级联清理仓库特质
#[async_trait]
pub trait CleanupRepository: Send + Sync {
    /// 命中 URL 前缀的 catalogue 任务 id
    async fn find_catalogue_task_ids(&self, url_prefix: &str)
        -> Result<Vec<i64>, RepositoryError>;
    /// 删除这些任务的全部抓取产出
    ///
    /// 单事务内依次删除 listing_task_runs、listing_snapshots、
    /// listings、task_runs。scrape_tasks 行保持不动。部分完成会
    /// 产生孤儿行，必须原子执行。
    async fn purge_task_output(&self, task_ids: &[i64]) -> Result<CleanupReport, RepositoryError>;
}
