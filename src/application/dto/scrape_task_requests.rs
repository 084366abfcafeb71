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

use crate::domain::models::scrape_task::{
    NewScrapeTask, ScrapeTaskPatch, Site, TaskStatus, TaskType,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// 任务列表查询参数
///
/// 时间过滤字段均接受 RFC 3339 字符串，非法枚举值在反序列化
/// 阶段即被拒绝，不会到达数据层。
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListScrapeTasksQueryDto {
    /// 每页数量，1-1000，默认100
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// 偏移量
    pub offset: Option<u64>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub site: Option<Site>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub scheduled_at_from: Option<DateTime<FixedOffset>>,
    pub scheduled_at_to: Option<DateTime<FixedOffset>>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub created_at_from: Option<DateTime<FixedOffset>>,
    pub created_at_to: Option<DateTime<FixedOffset>>,
}

/// 工作器轮询类端点的查询参数
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PollQueryDto {
    /// 每页数量，1-500，默认100
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

/// running/failed 列表的查询参数
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StatusListQueryDto {
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    pub task_type: Option<TaskType>,
    pub site: Option<Site>,
}

/// 创建任务请求
///
/// site/url/task_type 必填；status 缺省为 pending。
#[derive(Debug, Deserialize)]
pub struct CreateScrapeTaskDto {
    pub site: Site,
    pub url: String,
    pub task_type: TaskType,
    pub status: Option<TaskStatus>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub locked_at: Option<DateTime<FixedOffset>>,
    pub attempts: Option<i32>,
    pub max_attempts: Option<i32>,
    pub last_error: Option<String>,
    pub meta: Option<serde_json::Value>,
}

impl From<CreateScrapeTaskDto> for NewScrapeTask {
    fn from(dto: CreateScrapeTaskDto) -> Self {
        Self {
            site: dto.site,
            url: dto.url,
            task_type: dto.task_type,
            status: dto.status,
            scheduled_at: dto.scheduled_at,
            locked_at: dto.locked_at,
            attempts: dto.attempts,
            max_attempts: dto.max_attempts,
            last_error: dto.last_error,
            // an explicit null degrades to the default empty object
            meta: dto.meta.filter(|v| !v.is_null()),
        }
    }
}

/// 部分更新请求
///
/// 缺席的字段保持原值。可空列区分 "缺席" 与 "显式 null"
/// （后者将列置空）；meta 是唯一的例外，显式 null 同样被忽略，
/// 只有具体对象才会整体替换。
#[derive(Debug, Default, Deserialize)]
pub struct UpdateScrapeTaskDto {
    pub site: Option<Site>,
    pub url: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_at: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub locked_at: Option<Option<DateTime<FixedOffset>>>,
    pub attempts: Option<i32>,
    pub max_attempts: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_error: Option<Option<String>>,
    pub meta: Option<serde_json::Value>,
}

impl From<UpdateScrapeTaskDto> for ScrapeTaskPatch {
    fn from(dto: UpdateScrapeTaskDto) -> Self {
        Self {
            site: dto.site,
            url: dto.url,
            task_type: dto.task_type,
            status: dto.status,
            scheduled_at: dto.scheduled_at,
            locked_at: dto.locked_at,
            attempts: dto.attempts,
            max_attempts: dto.max_attempts,
            last_error: dto.last_error,
            // `meta: null` means "leave unchanged", not "clear"
            meta: dto.meta.filter(|v| !v.is_null()),
        }
    }
}

/// 区分 "字段缺席" 与 "显式 null" 的反序列化辅助
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
