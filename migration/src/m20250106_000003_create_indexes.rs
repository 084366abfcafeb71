use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index for the worker polling query: status + scheduled_at
        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_tasks_status_scheduled_at")
                    .table(ScrapeTasks::Table)
                    .col(ScrapeTasks::Status)
                    .col(ScrapeTasks::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        // Index for URL-prefix lookups (related/by_url, summary/by_url, cleanup)
        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_tasks_url")
                    .table(ScrapeTasks::Table)
                    .col(ScrapeTasks::Url)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_runs_task_id")
                    .table(TaskRuns::Table)
                    .col(TaskRuns::TaskId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_snapshots_listing_id")
                    .table(ListingSnapshots::Table)
                    .col(ListingSnapshots::ListingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scrape_tasks_status_scheduled_at")
                    .table(ScrapeTasks::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scrape_tasks_url")
                    .table(ScrapeTasks::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_task_runs_task_id")
                    .table(TaskRuns::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_listing_snapshots_listing_id")
                    .table(ListingSnapshots::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ScrapeTasks {
    Table,
    Status,
    ScheduledAt,
    Url,
}

#[derive(DeriveIden)]
enum TaskRuns {
    Table,
    TaskId,
}

#[derive(DeriveIden)]
enum ListingSnapshots {
    Table,
    ListingId,
}
