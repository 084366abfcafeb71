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

use crate::presentation::errors::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// X-API-Key 请求头名称
pub const API_KEY_HEADER: &str = "X-API-Key";

/// 认证状态
///
/// 单一全局共享密钥。密钥未配置时所有受保护请求返回 500：
/// 宁可拒绝服务也不在缺失配置时放行。
#[derive(Clone)]
pub struct AuthState {
    /// 服务端配置的 API 密钥
    pub api_key: Option<String>,
}

/// 认证中间件
///
/// 校验请求头 X-API-Key 与服务端密钥一致。
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(ApiError)` - 认证失败
pub async fn auth_middleware(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Allow public endpoints
    let path = req.uri().path();
    debug!("AuthMiddleware processing path: {}", path);
    if path == "/health" || path == "/v1/version" {
        return Ok(next.run(req).await);
    }

    let expected = state.api_key.as_deref().ok_or_else(|| {
        tracing::error!("API key is not configured; rejecting request");
        ApiError::ApiKeyNotConfigured
    })?;

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::InvalidApiKey)?;

    if presented != expected {
        return Err(ApiError::InvalidApiKey);
    }

    Ok(next.run(req).await)
}
