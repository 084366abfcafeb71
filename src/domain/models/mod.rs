// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod analytics;
pub mod scrape_task;
