// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod analytics_repo_impl;
pub mod cleanup_repo_impl;
pub mod scrape_task_repo_impl;
