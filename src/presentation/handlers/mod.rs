// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod analytics_handler;
pub mod cleanup_handler;
pub mod listing_handler;
pub mod scrape_task_handler;
