// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 抓取任务实体
///
/// 表示一个待执行的站点抓取工作单元。任务由 API 或工作器创建，
/// 状态流转由调用方驱动（pending/running/done/failed），服务端
/// 不强制状态机。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeTask {
    /// 任务唯一标识符（数据库自增）
    pub id: i64,
    /// 目标站点
    pub site: Site,
    /// 目标URL
    pub url: String,
    /// 任务类型，决定工作器的处理方式
    pub task_type: TaskType,
    /// 任务状态
    pub status: TaskStatus,
    /// 计划执行时间，null 表示立即可执行
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    /// 工作器认领任务的时间
    pub locked_at: Option<DateTime<FixedOffset>>,
    /// 已尝试次数
    pub attempts: i32,
    /// 最大尝试次数
    pub max_attempts: i32,
    /// 最近一次失败的错误信息
    pub last_error: Option<String>,
    /// 开放式键值元数据，由生产方自由扩展
    pub meta: serde_json::Value,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 最后更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl ScrapeTask {
    /// 仅 pending/failed 状态的任务允许删除
    pub fn is_deletable(&self) -> bool {
        matches!(self.status, TaskStatus::Pending | TaskStatus::Failed)
    }
}

/// 新建任务的字段集合
///
/// `status` 缺省时由仓库落为 pending，`meta` 缺省为空对象。
#[derive(Debug, Clone)]
pub struct NewScrapeTask {
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

/// 部分更新的字段集合
///
/// 外层 `None` 表示该字段未出现在请求中，保持原值。可空列使用
/// 双层 Option：`Some(None)` 表示显式置空。`meta` 例外——显式的
/// null 同样被忽略，只有具体对象才会整体替换（调用方约定）。
#[derive(Debug, Clone, Default)]
pub struct ScrapeTaskPatch {
    pub site: Option<Site>,
    pub url: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub scheduled_at: Option<Option<DateTime<FixedOffset>>>,
    pub locked_at: Option<Option<DateTime<FixedOffset>>>,
    pub attempts: Option<i32>,
    pub max_attempts: Option<i32>,
    pub last_error: Option<Option<String>>,
    pub meta: Option<serde_json::Value>,
}

/// 站点枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    #[default]
    Easylive,
    TheSaleroom,
}

impl Site {
    /// 全部合法取值，供枚举端点使用
    pub fn values() -> &'static [&'static str] {
        &["easylive", "the_saleroom"]
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Site::Easylive => write!(f, "easylive"),
            Site::TheSaleroom => write!(f, "the_saleroom"),
        }
    }
}

impl FromStr for Site {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easylive" => Ok(Site::Easylive),
            "the_saleroom" => Ok(Site::TheSaleroom),
            _ => Err(()),
        }
    }
}

/// 任务类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// 发现新的拍卖目录页
    #[default]
    Discover,
    /// 抓取单个拍品页
    Listing,
    /// 重新抓取已有拍品
    Rescrape,
    /// 抓取整个目录
    Catalogue,
    /// 抓取拍卖时间信息
    AuctionTimes,
}

impl TaskType {
    pub fn values() -> &'static [&'static str] {
        &["discover", "listing", "rescrape", "catalogue", "auction_times"]
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskType::Discover => write!(f, "discover"),
            TaskType::Listing => write!(f, "listing"),
            TaskType::Rescrape => write!(f, "rescrape"),
            TaskType::Catalogue => write!(f, "catalogue"),
            TaskType::AuctionTimes => write!(f, "auction_times"),
        }
    }
}

impl FromStr for TaskType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discover" => Ok(TaskType::Discover),
            "listing" => Ok(TaskType::Listing),
            "rescrape" => Ok(TaskType::Rescrape),
            "catalogue" => Ok(TaskType::Catalogue),
            "auction_times" => Ok(TaskType::AuctionTimes),
            _ => Err(()),
        }
    }
}

/// 任务状态枚举
///
/// 状态由调用方（工作器）驱动：pending → running → done/failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 等待执行
    #[default]
    Pending,
    /// 工作器执行中
    Running,
    /// 执行成功
    Done,
    /// 执行失败
    Failed,
}

impl TaskStatus {
    pub fn values() -> &'static [&'static str] {
        &["pending", "running", "done", "failed"]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "done" => Ok(TaskStatus::Done),
            "failed" => Ok(TaskStatus::Failed),
            _ => Err(()),
        }
    }
}
