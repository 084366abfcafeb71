// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod analytics_requests;
pub mod analytics_responses;
pub mod scrape_task_requests;
pub mod scrape_task_responses;
