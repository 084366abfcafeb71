// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::scrape_task_requests::{
    CreateScrapeTaskDto, ListScrapeTasksQueryDto, PollQueryDto, StatusListQueryDto,
    UpdateScrapeTaskDto,
};
use crate::application::dto::scrape_task_responses::{
    FailedScrapeTaskListResponseDto, ScrapeTaskEnumsDto, ScrapeTaskListResponseDto,
};
use crate::domain::models::scrape_task::{ScrapeTask, Site, TaskStatus, TaskType};
use crate::domain::repositories::scrape_task_repository::{ScrapeTaskRepository, TaskListParams};
use crate::presentation::errors::ApiError;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// 默认每页数量
const DEFAULT_LIMIT: u64 = 100;

/// 按过滤条件分页列出任务
///
/// # 参数
/// * `query` - 分页与过滤参数
///
/// # 返回值
/// * `Ok(Json)` - 任务列表及分页前总数
/// * `Err(ApiError)` - 参数校验失败或数据层错误
pub async fn list_scrape_tasks<R>(
    Extension(repo): Extension<Arc<R>>,
    Query(query): Query<ListScrapeTasksQueryDto>,
) -> Result<Json<ScrapeTaskListResponseDto>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let params = TaskListParams {
        task_type: query.task_type,
        status: query.status,
        site: query.site,
        scheduled_at: query.scheduled_at,
        scheduled_at_from: query.scheduled_at_from,
        scheduled_at_to: query.scheduled_at_to,
        created_at: query.created_at,
        created_at_from: query.created_at_from,
        created_at_to: query.created_at_to,
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
        offset: query.offset.unwrap_or(0),
    };

    let (items, total) = repo.list(&params).await?;
    Ok(Json(ScrapeTaskListResponseDto { total, items }))
}

/// 枚举取值端点
///
/// site/task_type/status 为固定集合；auction_times 由全表
/// meta 扫描去重得出。
pub async fn get_scrape_task_enums<R>(
    Extension(repo): Extension<Arc<R>>,
) -> Result<Json<ScrapeTaskEnumsDto>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    let auction_times = repo.distinct_auction_times().await?;
    Ok(Json(ScrapeTaskEnumsDto {
        site: Site::values().to_vec(),
        task_type: TaskType::values().to_vec(),
        status: TaskStatus::values().to_vec(),
        auction_times,
    }))
}

/// 按ID获取单个任务
pub async fn get_scrape_task<R>(
    Extension(repo): Extension<Arc<R>>,
    Path(id): Path<i64>,
) -> Result<Json<ScrapeTask>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    let task = repo.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(task))
}

/// 创建新任务
///
/// 同一 (site, url, task_type, scheduled_at) 下已有 pending
/// 任务时返回 409，响应体携带已有任务 id。
pub async fn create_scrape_task<R>(
    Extension(repo): Extension<Arc<R>>,
    Json(request): Json<CreateScrapeTaskDto>,
) -> Result<(StatusCode, Json<ScrapeTask>), ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    let new_task = request.into();

    if let Some(existing) = repo.find_pending_duplicate(&new_task).await? {
        return Err(ApiError::DuplicatePending {
            existing_id: existing.id,
        });
    }

    let task = repo.create(&new_task).await?;
    info!(task_id = task.id, url = %task.url, "Scrape task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// 部分更新任务
pub async fn update_scrape_task<R>(
    Extension(repo): Extension<Arc<R>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateScrapeTaskDto>,
) -> Result<Json<ScrapeTask>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    let patch = request.into();
    let task = repo.update(id, &patch).await?;
    Ok(Json(task))
}

/// 删除任务
///
/// 仅 pending 或 failed 状态可删，其余返回 409。
pub async fn delete_scrape_task<R>(
    Extension(repo): Extension<Arc<R>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    let task = repo.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    if !task.is_deletable() {
        return Err(ApiError::Conflict(format!(
            "Cannot delete task in status '{}'",
            task.status
        )));
    }

    repo.delete(id).await?;
    info!(task_id = id, "Scrape task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 工作器认领端点：已到期的 pending 任务
pub async fn next_pending_scrape_tasks<R>(
    Extension(repo): Extension<Arc<R>>,
    Query(query): Query<PollQueryDto>,
) -> Result<Json<ScrapeTaskListResponseDto>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (items, total) = repo.next_pending(query.limit.unwrap_or(DEFAULT_LIMIT)).await?;
    Ok(Json(ScrapeTaskListResponseDto { total, items }))
}

/// 未到期的 pending 任务
pub async fn pending_future_scrape_tasks<R>(
    Extension(repo): Extension<Arc<R>>,
    Query(query): Query<PollQueryDto>,
) -> Result<Json<ScrapeTaskListResponseDto>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (items, total) = repo
        .pending_future(query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(ScrapeTaskListResponseDto { total, items }))
}

/// 正在运行的任务，最近更新优先
pub async fn running_scrape_tasks<R>(
    Extension(repo): Extension<Arc<R>>,
    Query(query): Query<StatusListQueryDto>,
) -> Result<Json<ScrapeTaskListResponseDto>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (items, total) = repo
        .list_by_status(
            TaskStatus::Running,
            query.task_type,
            query.site,
            query.limit.unwrap_or(DEFAULT_LIMIT),
        )
        .await?;
    Ok(Json(ScrapeTaskListResponseDto { total, items }))
}

/// 失败任务列表，last_error 以 failure_reason 暴露
pub async fn failed_scrape_tasks<R>(
    Extension(repo): Extension<Arc<R>>,
    Query(query): Query<StatusListQueryDto>,
) -> Result<Json<FailedScrapeTaskListResponseDto>, ApiError>
where
    R: ScrapeTaskRepository + 'static,
{
    query
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (items, total) = repo
        .list_by_status(
            TaskStatus::Failed,
            query.task_type,
            query.site,
            query.limit.unwrap_or(DEFAULT_LIMIT),
        )
        .await?;
    Ok(Json(FailedScrapeTaskListResponseDto {
        total,
        items: items.into_iter().map(Into::into).collect(),
    }))
}
