// Copyright (c) 2025 scrapetasks contributors
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scrape_tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site: String,
    pub url: String,
    pub task_type: String,
    pub status: String,
    pub scheduled_at: Option<ChronoDateTimeWithTimeZone>,
    pub locked_at: Option<ChronoDateTimeWithTimeZone>,
    pub attempts: i32,
    pub max_attempts: i32,
    pub last_error: Option<String>,
    pub meta: Json,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
