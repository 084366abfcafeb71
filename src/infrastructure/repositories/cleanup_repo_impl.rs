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

use crate::domain::models::analytics::CleanupReport;
use crate::domain::models::scrape_task::TaskType;
use crate::domain::repositories::cleanup_repository::CleanupRepository;
use crate::domain::repositories::scrape_task_repository::RepositoryError;
use crate::infrastructure::database::entities::{
    listing, listing_snapshot, listing_task_run, scrape_task, task_run,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, TransactionTrait,
};
use std::sync::Arc;

/// 级联清理仓库实现
///
/// 手工展开的级联删除：表之间没有外键级联约束，删除顺序
/// listing_task_runs → listing_snapshots → listings → task_runs
/// 必须在同一事务内完成。
#[derive(Clone)]
pub struct CleanupRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CleanupRepositoryImpl {
    /// 创建新的清理仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CleanupRepository for CleanupRepositoryImpl {
    async fn find_catalogue_task_ids(
        &self,
        url_prefix: &str,
    ) -> Result<Vec<i64>, RepositoryError> {
        let ids: Vec<i64> = scrape_task::Entity::find()
            .select_only()
            .column(scrape_task::Column::Id)
            .filter(scrape_task::Column::TaskType.eq(TaskType::Catalogue.to_string()))
            .filter(scrape_task::Column::Url.starts_with(url_prefix))
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(ids)
    }

    async fn purge_task_output(&self, task_ids: &[i64]) -> Result<CleanupReport, RepositoryError> {
        let txn = self.db.begin().await?;

        let run_ids: Vec<i64> = task_run::Entity::find()
            .select_only()
            .column(task_run::Column::Id)
            .filter(task_run::Column::TaskId.is_in(task_ids.to_vec()))
            .into_tuple()
            .all(&txn)
            .await?;

        let listing_ids: Vec<i64> = listing_task_run::Entity::find()
            .select_only()
            .column(listing_task_run::Column::ListingId)
            .distinct()
            .filter(listing_task_run::Column::TaskRunId.is_in(run_ids.clone()))
            .into_tuple()
            .all(&txn)
            .await?;

        let listing_task_runs_deleted = listing_task_run::Entity::delete_many()
            .filter(listing_task_run::Column::TaskRunId.is_in(run_ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;

        let listing_snapshots_deleted = listing_snapshot::Entity::delete_many()
            .filter(listing_snapshot::Column::ListingId.is_in(listing_ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;

        let listings_deleted = listing::Entity::delete_many()
            .filter(listing::Column::Id.is_in(listing_ids))
            .exec(&txn)
            .await?
            .rows_affected;

        let task_runs_deleted = task_run::Entity::delete_many()
            .filter(task_run::Column::Id.is_in(run_ids))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;

        Ok(CleanupReport {
            task_ids: task_ids.to_vec(),
            task_runs_deleted,
            listing_task_runs_deleted,
            listings_deleted,
            listing_snapshots_deleted,
        })
    }
}
