// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::repositories::scrape_task_repository::RepositoryError;

/// 应用错误类型
///
/// 封装全部对外可见的错误，统一映射为 HTTP 状态码和
/// `{"detail": ...}` JSON 响应体。
#[derive(Error, Debug)]
pub enum ApiError {
    /// 服务端未配置 API 密钥（fail-closed，永不放行）
    #[error("API key is not configured")]
    ApiKeyNotConfigured,
    /// API 密钥缺失或不匹配
    #[error("Invalid API key")]
    InvalidApiKey,
    /// 记录或匹配项不存在
    #[error("Not found")]
    NotFound,
    /// 状态冲突（如删除非 pending/failed 任务）
    #[error("{0}")]
    Conflict(String),
    /// 重复的 pending 任务，响应体携带已有任务 id
    #[error("A pending task already exists for this site, url, task_type and scheduled_at")]
    DuplicatePending { existing_id: i64 },
    /// 请求参数校验失败
    #[error("{0}")]
    Validation(String),
    /// 数据层错误
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::ApiKeyNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::DuplicatePending { .. } => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Repository(RepositoryError::Database(err)) => {
                tracing::error!("Database error: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            ApiError::DuplicatePending { existing_id } => Json(json!({
                "detail": self.to_string(),
                "existing_id": existing_id,
            })),
            _ => Json(json!({ "detail": self.to_string() })),
        };

        (status, body).into_response()
    }
}
