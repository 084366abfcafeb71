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

use crate::domain::models::analytics::{
    AuctioneerLots, AuctioneerPriceSummary, EasyliveAuctionRollup, ListingPage,
    ListingSnapshotDetail, ListingSnapshotGroup, RelatedUrlGroup, StatusSummary, TaskWithCounts,
};
use crate::domain::repositories::analytics_repository::AnalyticsRepository;
use crate::domain::repositories::scrape_task_repository::RepositoryError;
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use std::sync::Arc;

/// 分析查询仓库实现
///
/// 固定的一组参数化只读聚合 SQL。聚合语句是 Postgres 方言
/// （split_part、JSONB 操作符、FILTER、DISTINCT ON）。
#[derive(Clone)]
pub struct AnalyticsRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

/// 任务与快照产出的公共连接（st → tr → ltr → ls），带 URL 前缀过滤
const TASK_OUTPUT_JOINS: &str = r#"
    FROM scrape_tasks st
    LEFT JOIN task_runs tr ON tr.task_id = st.id
    LEFT JOIN listing_task_runs ltr ON ltr.task_run_id = tr.id
    LEFT JOIN listing_snapshots ls ON ls.listing_id = ltr.listing_id
"#;

impl AnalyticsRepositoryImpl {
    /// 创建新的分析仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn stmt(sql: &str, values: Vec<sea_orm::Value>) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }

    async fn listing_page(
        &self,
        filter_sql: &str,
        filter_value: sea_orm::Value,
        limit: u64,
        offset: u64,
    ) -> Result<ListingPage, RepositoryError> {
        let joins = r#"
            FROM task_runs tr
            JOIN listing_task_runs ltr ON ltr.task_run_id = tr.id
            JOIN listing_snapshots ls ON ls.listing_id = ltr.listing_id
            JOIN scrape_tasks st ON st.id = tr.task_id
        "#;

        // total counts the joined snapshot rows, i.e. the set LIMIT/OFFSET
        // below paginates over
        let totals_sql = format!(
            r#"
            SELECT
                COUNT(ls.id) AS total,
                COUNT(DISTINCT ltr.listing_id) AS total_listings,
                AVG((ls.data->>'estimate_low')::float8) AS avg_estimate_low,
                AVG((ls.data->>'estimate_high')::float8) AS avg_estimate_high,
                AVG((ls.data->>'sold_price')::float8) AS avg_sold_price
            {joins}
            WHERE {filter_sql}
            "#
        );
        let row = self
            .db
            .query_one(Self::stmt(&totals_sql, vec![filter_value.clone()]))
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let total: i64 = row.try_get("", "total")?;
        let total_listings: i64 = row.try_get("", "total_listings")?;
        let avg_estimate_low: Option<f64> = row.try_get("", "avg_estimate_low")?;
        let avg_estimate_high: Option<f64> = row.try_get("", "avg_estimate_high")?;
        let avg_sold_price: Option<f64> = row.try_get("", "avg_sold_price")?;

        let items_sql = format!(
            r#"
            SELECT
                ltr.listing_id,
                tr.auctioneer_name,
                ls.snapshot_type,
                ls.data,
                ls.created_at
            {joins}
            WHERE {filter_sql}
            ORDER BY ltr.listing_id ASC, ls.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let items = ListingSnapshotDetail::find_by_statement(Self::stmt(
            &items_sql,
            vec![filter_value, (limit as i64).into(), (offset as i64).into()],
        ))
        .all(self.db.as_ref())
        .await?;

        Ok(ListingPage {
            total: total as u64,
            total_listings,
            avg_estimate_low,
            avg_estimate_high,
            avg_sold_price,
            items,
        })
    }
}

#[derive(Debug, FromQueryResult)]
struct StatusCount {
    status: String,
    count: i64,
}

#[async_trait]
impl AnalyticsRepository for AnalyticsRepositoryImpl {
    async fn status_summary(&self) -> Result<StatusSummary, RepositoryError> {
        let rows = StatusCount::find_by_statement(Self::stmt(
            "SELECT status, COUNT(*) AS count FROM scrape_tasks GROUP BY status",
            vec![],
        ))
        .all(self.db.as_ref())
        .await?;

        let mut summary = StatusSummary {
            total: 0,
            pending: 0,
            running: 0,
            done: 0,
            failed: 0,
        };
        for row in rows {
            summary.total += row.count;
            match row.status.as_str() {
                "pending" => summary.pending = row.count,
                "running" => summary.running = row.count,
                "done" => summary.done = row.count,
                "failed" => summary.failed = row.count,
                _ => {}
            }
        }
        Ok(summary)
    }

    async fn easylive_auction_rollup(
        &self,
        limit: u64,
    ) -> Result<Vec<EasyliveAuctionRollup>, RepositoryError> {
        let sql = r#"
            WITH base AS (
                SELECT
                    tr.auctioneer_name,
                    split_part(tr.url, '?', 1) AS url_no_query,
                    tr.stats
                FROM scrape_tasks st
                JOIN task_runs tr ON tr.task_id = st.id
                WHERE st.task_type = 'catalogue'
                  AND st.site = 'easylive'
                  AND tr.url LIKE '%/catalogue/%'
            )
            SELECT
                auctioneer_name,
                split_part(split_part(url_no_query, 'catalogue/', 2), '/', 1) AS catalogue_id,
                split_part(split_part(url_no_query, 'catalogue/', 2), '/', 2) AS auction_id,
                NULLIF(split_part(split_part(url_no_query, 'catalogue/', 2), '/', 3), '') AS slug,
                COUNT(*) AS run_count,
                SUM((stats->>'lots_found')::int) AS lots_scraped,
                SUM((stats->>'hammer_prices_found')::int) AS hammer_prices_found
            FROM base
            GROUP BY 1, 2, 3, 4
            ORDER BY lots_scraped DESC NULLS LAST
            LIMIT $1
        "#;
        let rows = EasyliveAuctionRollup::find_by_statement(Self::stmt(
            sql,
            vec![(limit as i64).into()],
        ))
        .all(self.db.as_ref())
        .await?;
        Ok(rows)
    }

    async fn related_by_url(
        &self,
        url_prefix: &str,
    ) -> Result<Vec<RelatedUrlGroup>, RepositoryError> {
        let sql = r#"
            SELECT
                st.url,
                st.task_type,
                st.status,
                st.meta->>'source' AS source,
                COUNT(DISTINCT st.id) AS task_count,
                COUNT(DISTINCT ltr.listing_id) AS listing_count,
                MAX(st.created_at) AS latest_created_at,
                MAX(st.updated_at) AS latest_updated_at
            FROM scrape_tasks st
            LEFT JOIN task_runs tr ON tr.task_id = st.id
            LEFT JOIN listing_task_runs ltr ON ltr.task_run_id = tr.id
            WHERE st.url LIKE $1
            GROUP BY st.url, st.task_type, st.status, st.meta->>'source'
            ORDER BY latest_updated_at DESC NULLS LAST
        "#;
        let rows = RelatedUrlGroup::find_by_statement(Self::stmt(
            sql,
            vec![format!("{url_prefix}%").into()],
        ))
        .all(self.db.as_ref())
        .await?;
        Ok(rows)
    }

    async fn summary_by_url(
        &self,
        url_prefix: &str,
    ) -> Result<Vec<TaskWithCounts>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT
                st.*,
                COUNT(DISTINCT ltr.listing_id) AS listing_count,
                COUNT(DISTINCT ls.id) AS snapshot_count
            {TASK_OUTPUT_JOINS}
            WHERE st.url LIKE $1
            GROUP BY st.id
            ORDER BY st.updated_at DESC NULLS LAST, st.created_at DESC
            "#
        );
        let rows = TaskWithCounts::find_by_statement(Self::stmt(
            &sql,
            vec![format!("{url_prefix}%").into()],
        ))
        .all(self.db.as_ref())
        .await?;
        Ok(rows)
    }

    async fn listing_snapshots_by_url_pattern(
        &self,
        url_pattern: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ListingSnapshotGroup>, u64), RepositoryError> {
        let count_sql = r#"
            SELECT COUNT(DISTINCT ltr.listing_id) AS total
            FROM scrape_tasks st
            JOIN task_runs tr ON tr.task_id = st.id
            JOIN listing_task_runs ltr ON ltr.task_run_id = tr.id
            WHERE st.url LIKE $1
        "#;
        let row = self
            .db
            .query_one(Self::stmt(count_sql, vec![url_pattern.into()]))
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let total: i64 = row.try_get("", "total")?;

        let sql = r#"
            WITH matched AS (
                SELECT DISTINCT ltr.listing_id
                FROM scrape_tasks st
                JOIN task_runs tr ON tr.task_id = st.id
                JOIN listing_task_runs ltr ON ltr.task_run_id = tr.id
                WHERE st.url LIKE $1
            ),
            latest AS (
                SELECT DISTINCT ON (ls.listing_id)
                    ls.listing_id,
                    ls.data
                FROM listing_snapshots ls
                JOIN matched m ON m.listing_id = ls.listing_id
                ORDER BY ls.listing_id, ls.created_at DESC
            )
            SELECT
                m.listing_id,
                l.data->>'auction_start' AS auction_start,
                l.data->>'auction_end' AS auction_end,
                (l.data->>'estimate_low')::float8 AS estimate_low,
                (l.data->>'estimate_high')::float8 AS estimate_high,
                (l.data->>'sold_price')::float8 AS sold_price,
                COUNT(*) FILTER (WHERE ls.snapshot_type = 'pre_auction') AS pre_auction_count,
                COUNT(*) FILTER (WHERE ls.snapshot_type = 'post_auction') AS post_auction_count,
                COUNT(ls.id) AS snapshot_count,
                MAX(ls.created_at) AS latest_snapshot_at
            FROM matched m
            LEFT JOIN latest l ON l.listing_id = m.listing_id
            LEFT JOIN listing_snapshots ls ON ls.listing_id = m.listing_id
            GROUP BY m.listing_id, l.data
            ORDER BY m.listing_id
            LIMIT $2 OFFSET $3
        "#;
        let rows = ListingSnapshotGroup::find_by_statement(Self::stmt(
            sql,
            vec![
                url_pattern.into(),
                (limit as i64).into(),
                (offset as i64).into(),
            ],
        ))
        .all(self.db.as_ref())
        .await?;

        Ok((rows, total as u64))
    }

    async fn recent_done(
        &self,
        limit: u64,
    ) -> Result<(Vec<TaskWithCounts>, u64), RepositoryError> {
        let row = self
            .db
            .query_one(Self::stmt(
                "SELECT COUNT(*) AS total FROM scrape_tasks WHERE status = 'done'",
                vec![],
            ))
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let total: i64 = row.try_get("", "total")?;

        let sql = format!(
            r#"
            SELECT
                st.*,
                COUNT(DISTINCT ltr.listing_id) AS listing_count,
                COUNT(DISTINCT ls.id) AS snapshot_count
            {TASK_OUTPUT_JOINS}
            WHERE st.status = 'done'
            GROUP BY st.id
            ORDER BY st.updated_at DESC NULLS LAST, st.created_at DESC
            LIMIT $1
            "#
        );
        let rows =
            TaskWithCounts::find_by_statement(Self::stmt(&sql, vec![(limit as i64).into()]))
                .all(self.db.as_ref())
                .await?;
        Ok((rows, total as u64))
    }

    async fn auctioneer_prices(&self) -> Result<Vec<AuctioneerPriceSummary>, RepositoryError> {
        // AVG over the joined snapshot rows, not over distinct listings:
        // matches the historical report shape even though an upstream
        // duplicate can weight the average
        let sql = r#"
            SELECT
                tr.auctioneer_name,
                COUNT(DISTINCT ltr.listing_id) AS lots_analysed,
                AVG((ls.data->>'estimate_low')::float8) AS est_lo,
                AVG((ls.data->>'estimate_high')::float8) AS est_hi,
                AVG((ls.data->>'sold_price')::float8) AS sold
            FROM task_runs tr
            JOIN listing_task_runs ltr ON ltr.task_run_id = tr.id
            JOIN listing_snapshots ls ON ls.listing_id = ltr.listing_id
            GROUP BY tr.auctioneer_name
            ORDER BY lots_analysed DESC
        "#;
        let rows = AuctioneerPriceSummary::find_by_statement(Self::stmt(sql, vec![]))
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    async fn auctioneer_lots(&self) -> Result<Vec<AuctioneerLots>, RepositoryError> {
        let sql = r#"
            SELECT
                tr.auctioneer_name,
                COUNT(DISTINCT ltr.listing_id) AS distinct_lots,
                MAX(ls.created_at) AS latest_snapshot_created_at
            FROM task_runs tr
            JOIN scrape_tasks st ON st.id = tr.task_id
            JOIN listing_task_runs ltr ON ltr.task_run_id = tr.id
            LEFT JOIN listing_snapshots ls ON ls.listing_id = ltr.listing_id
            WHERE st.site = 'easylive'
            GROUP BY tr.auctioneer_name
            ORDER BY distinct_lots DESC
        "#;
        let rows = AuctioneerLots::find_by_statement(Self::stmt(sql, vec![]))
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    async fn listings_by_catalogue(
        &self,
        url: &str,
        limit: u64,
        offset: u64,
    ) -> Result<ListingPage, RepositoryError> {
        self.listing_page(
            "st.url = $1 AND st.task_type = 'catalogue'",
            url.into(),
            limit,
            offset,
        )
        .await
    }

    async fn listings_by_auctioneer(
        &self,
        name: &str,
        limit: u64,
        offset: u64,
    ) -> Result<ListingPage, RepositoryError> {
        self.listing_page("tr.auctioneer_name = $1", name.into(), limit, offset)
            .await
    }

    async fn auctioneer_names(&self) -> Result<Vec<String>, RepositoryError> {
        let sql = r#"
            SELECT DISTINCT tr.auctioneer_name
            FROM task_runs tr
            WHERE tr.auctioneer_name IS NOT NULL AND tr.auctioneer_name <> ''
            ORDER BY tr.auctioneer_name
        "#;
        let rows = self.db.query_all(Self::stmt(sql, vec![])).await?;
        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            names.push(row.try_get("", "auctioneer_name")?);
        }
        Ok(names)
    }
}
