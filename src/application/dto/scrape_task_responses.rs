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

use crate::domain::models::scrape_task::{ScrapeTask, Site, TaskStatus, TaskType};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// 任务列表响应
///
/// total 为分页前的匹配总数。
#[derive(Debug, Serialize)]
pub struct ScrapeTaskListResponseDto {
    pub total: u64,
    pub items: Vec<ScrapeTask>,
}

/// 枚举取值响应，供客户端表单填充
#[derive(Debug, Serialize)]
pub struct ScrapeTaskEnumsDto {
    pub site: Vec<&'static str>,
    pub task_type: Vec<&'static str>,
    pub status: Vec<&'static str>,
    /// 所有任务 meta 中出现过的非空 auction_time 取值
    pub auction_times: Vec<String>,
}

/// 失败任务行：last_error 以 failure_reason 暴露
#[derive(Debug, Serialize)]
pub struct FailedScrapeTaskDto {
    pub id: i64,
    pub site: Site,
    pub url: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub locked_at: Option<DateTime<FixedOffset>>,
    pub attempts: i32,
    pub max_attempts: i32,
    pub failure_reason: Option<String>,
    pub meta: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<ScrapeTask> for FailedScrapeTaskDto {
    fn from(task: ScrapeTask) -> Self {
        Self {
            id: task.id,
            site: task.site,
            url: task.url,
            task_type: task.task_type,
            status: task.status,
            scheduled_at: task.scheduled_at,
            locked_at: task.locked_at,
            attempts: task.attempts,
            max_attempts: task.max_attempts,
            failure_reason: task.last_error,
            meta: task.meta,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// 失败任务列表响应
#[derive(Debug, Serialize)]
pub struct FailedScrapeTaskListResponseDto {
    pub total: u64,
    pub items: Vec<FailedScrapeTaskDto>,
}

/// 级联清理响应
#[derive(Debug, Serialize)]
pub struct CleanupResponseDto {
    pub dry_run: bool,
    pub task_ids: Vec<i64>,
    pub task_runs_deleted: u64,
    pub listing_task_runs_deleted: u64,
    pub listings_deleted: u64,
    pub listing_snapshots_deleted: u64,
}
