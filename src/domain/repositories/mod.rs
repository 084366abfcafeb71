// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod analytics_repository;
pub mod cleanup_repository;
pub mod scrape_task_repository;
