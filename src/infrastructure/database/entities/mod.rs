// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod listing;
pub mod listing_snapshot;
pub mod listing_task_run;
pub mod scrape_task;
pub mod task_run;
