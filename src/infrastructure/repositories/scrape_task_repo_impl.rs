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

use crate::domain::models::scrape_task::{
    NewScrapeTask, ScrapeTask, ScrapeTaskPatch, Site, TaskStatus, TaskType,
};
use crate::domain::repositories::scrape_task_repository::{
    RepositoryError, ScrapeTaskRepository, TaskListParams,
};
use crate::infrastructure::database::entities::scrape_task as task_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::NullOrdering;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// 抓取任务仓库实现
///
/// 基于SeaORM实体API实现的数据访问层
#[derive(Clone)]
pub struct ScrapeTaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapeTaskRepositoryImpl {
    /// 创建新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 统计后按 id 顺序取一页
    async fn paginate(
        &self,
        query: Select<task_entity::Entity>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ScrapeTask>, u64), RepositoryError> {
        let total = query.clone().count(self.db.as_ref()).await?;
        let items = query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok((items.into_iter().map(Into::into).collect(), total))
    }
}

impl From<task_entity::Model> for ScrapeTask {
    fn from(model: task_entity::Model) -> Self {
        Self {
            id: model.id,
            site: model.site.parse().unwrap_or_default(),
            url: model.url,
            task_type: model.task_type.parse().unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            scheduled_at: model.scheduled_at,
            locked_at: model.locked_at,
            attempts: model.attempts,
            max_attempts: model.max_attempts,
            last_error: model.last_error,
            meta: model.meta,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl ScrapeTaskRepository for ScrapeTaskRepositoryImpl {
    async fn list(
        &self,
        params: &TaskListParams,
    ) -> Result<(Vec<ScrapeTask>, u64), RepositoryError> {
        let mut query = task_entity::Entity::find();

        if let Some(task_type) = params.task_type {
            query = query.filter(task_entity::Column::TaskType.eq(task_type.to_string()));
        }
        if let Some(status) = params.status {
            query = query.filter(task_entity::Column::Status.eq(status.to_string()));
        }
        if let Some(site) = params.site {
            query = query.filter(task_entity::Column::Site.eq(site.to_string()));
        }
        if let Some(at) = params.scheduled_at {
            query = query.filter(task_entity::Column::ScheduledAt.eq(at));
        }
        if let Some(from) = params.scheduled_at_from {
            query = query.filter(task_entity::Column::ScheduledAt.gte(from));
        }
        if let Some(to) = params.scheduled_at_to {
            query = query.filter(task_entity::Column::ScheduledAt.lte(to));
        }
        if let Some(at) = params.created_at {
            query = query.filter(task_entity::Column::CreatedAt.eq(at));
        }
        if let Some(from) = params.created_at_from {
            query = query.filter(task_entity::Column::CreatedAt.gte(from));
        }
        if let Some(to) = params.created_at_to {
            query = query.filter(task_entity::Column::CreatedAt.lte(to));
        }

        let query = query.order_by_asc(task_entity::Column::Id);
        self.paginate(query, params.limit, params.offset).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ScrapeTask>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, task: &NewScrapeTask) -> Result<ScrapeTask, RepositoryError> {
        let now = Utc::now();
        let model = task_entity::ActiveModel {
            site: Set(task.site.to_string()),
            url: Set(task.url.clone()),
            task_type: Set(task.task_type.to_string()),
            status: Set(task.status.unwrap_or(TaskStatus::Pending).to_string()),
            scheduled_at: Set(task.scheduled_at),
            locked_at: Set(task.locked_at),
            attempts: Set(task.attempts.unwrap_or(0)),
            max_attempts: Set(task.max_attempts.unwrap_or(5)),
            last_error: Set(task.last_error.clone()),
            meta: Set(task
                .meta
                .clone()
                .unwrap_or_else(|| serde_json::json!({}))),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_pending_duplicate(
        &self,
        task: &NewScrapeTask,
    ) -> Result<Option<ScrapeTask>, RepositoryError> {
        let mut query = task_entity::Entity::find()
            .filter(task_entity::Column::Status.eq(TaskStatus::Pending.to_string()))
            .filter(task_entity::Column::Site.eq(task.site.to_string()))
            .filter(task_entity::Column::Url.eq(task.url.clone()))
            .filter(task_entity::Column::TaskType.eq(task.task_type.to_string()));

        query = match task.scheduled_at {
            Some(at) => query.filter(task_entity::Column::ScheduledAt.eq(at)),
            None => query.filter(task_entity::Column::ScheduledAt.is_null()),
        };

        let model = query.one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn update(
        &self,
        id: i64,
        patch: &ScrapeTaskPatch,
    ) -> Result<ScrapeTask, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: task_entity::ActiveModel = model.into();

        if let Some(site) = patch.site {
            active.site = Set(site.to_string());
        }
        if let Some(url) = &patch.url {
            active.url = Set(url.clone());
        }
        if let Some(task_type) = patch.task_type {
            active.task_type = Set(task_type.to_string());
        }
        if let Some(status) = patch.status {
            active.status = Set(status.to_string());
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            active.scheduled_at = Set(scheduled_at);
        }
        if let Some(locked_at) = patch.locked_at {
            active.locked_at = Set(locked_at);
        }
        if let Some(attempts) = patch.attempts {
            active.attempts = Set(attempts);
        }
        if let Some(max_attempts) = patch.max_attempts {
            active.max_attempts = Set(max_attempts);
        }
        if let Some(last_error) = &patch.last_error {
            active.last_error = Set(last_error.clone());
        }
        if let Some(meta) = &patch.meta {
            active.meta = Set(meta.clone());
        }

        // updated_at is stamped even when no field changed
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = task_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn next_pending(&self, limit: u64) -> Result<(Vec<ScrapeTask>, u64), RepositoryError> {
        let query = task_entity::Entity::find()
            .filter(task_entity::Column::Status.eq(TaskStatus::Pending.to_string()))
            .filter(
                Condition::any()
                    .add(task_entity::Column::ScheduledAt.is_null())
                    .add(task_entity::Column::ScheduledAt.lte(Utc::now())),
            )
            .order_by_with_nulls(
                task_entity::Column::ScheduledAt,
                Order::Asc,
                NullOrdering::Last,
            );
        self.paginate(query, limit, 0).await
    }

    async fn pending_future(&self, limit: u64) -> Result<(Vec<ScrapeTask>, u64), RepositoryError> {
        let query = task_entity::Entity::find()
            .filter(task_entity::Column::Status.eq(TaskStatus::Pending.to_string()))
            .filter(task_entity::Column::ScheduledAt.gt(Utc::now()))
            .order_by_with_nulls(
                task_entity::Column::ScheduledAt,
                Order::Asc,
                NullOrdering::Last,
            );
        self.paginate(query, limit, 0).await
    }

    async fn list_by_status(
        &self,
        status: TaskStatus,
        task_type: Option<TaskType>,
        site: Option<Site>,
        limit: u64,
    ) -> Result<(Vec<ScrapeTask>, u64), RepositoryError> {
        let mut query =
            task_entity::Entity::find().filter(task_entity::Column::Status.eq(status.to_string()));

        if let Some(task_type) = task_type {
            query = query.filter(task_entity::Column::TaskType.eq(task_type.to_string()));
        }
        if let Some(site) = site {
            query = query.filter(task_entity::Column::Site.eq(site.to_string()));
        }

        let query = query
            .order_by_with_nulls(
                task_entity::Column::UpdatedAt,
                Order::Desc,
                NullOrdering::Last,
            )
            .order_by_desc(task_entity::Column::CreatedAt);
        self.paginate(query, limit, 0).await
    }

    async fn distinct_auction_times(&self) -> Result<Vec<String>, RepositoryError> {
        // meta is producer-controlled, so the values are extracted in code
        // instead of with a backend-specific JSON operator
        let metas: Vec<serde_json::Value> = task_entity::Entity::find()
            .select_only()
            .column(task_entity::Column::Meta)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        let mut values = BTreeSet::new();
        for meta in metas {
            if let Some(value) = meta.get("auction_time").and_then(|v| v.as_str()) {
                if !value.is_empty() {
                    values.insert(value.to_string());
                }
            }
        }

        Ok(values.into_iter().collect())
    }
}
