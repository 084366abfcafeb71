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

use serde::Deserialize;
use validator::Validate;

/// 仅带 limit 的分析端点查询参数
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AnalyticsLimitQueryDto {
    /// 每页数量，1-1000，默认100
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
}

/// URL 前缀查询参数（related/summary 端点）
#[derive(Debug, Deserialize)]
pub struct UrlPrefixQueryDto {
    pub url_prefix: String,
}

/// 级联清理查询参数
#[derive(Debug, Deserialize)]
pub struct CleanupQueryDto {
    pub url_prefix: String,
    /// 只预览命中的任务 id，不做任何删除
    pub dry_run: Option<bool>,
}

/// URL LIKE 模式 + 分页
#[derive(Debug, Deserialize, Validate)]
pub struct UrlPatternQueryDto {
    pub url_pattern: String,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// 目录 URL + 分页
#[derive(Debug, Deserialize, Validate)]
pub struct CatalogueQueryDto {
    pub url: String,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// 拍卖行名称 + 分页
#[derive(Debug, Deserialize, Validate)]
pub struct AuctioneerQueryDto {
    pub name: String,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
