use sea_orm_migration::prelude::*;

/// 抓取产出表（task_runs / listings / listing_task_runs / listing_snapshots）
///
/// 这些表由外部抓取工作器写入，本服务只读取（级联清理除外）。
/// 在此创建它们是为了让开发和测试数据库开箱即用。
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskRuns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskRuns::TaskId).big_integer().not_null())
                    .col(ColumnDef::new(TaskRuns::Url).text().not_null())
                    .col(ColumnDef::new(TaskRuns::AuctioneerName).text())
                    .col(ColumnDef::new(TaskRuns::Stats).json_binary().not_null())
                    .col(
                        ColumnDef::new(TaskRuns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingTaskRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingTaskRuns::TaskRunId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingTaskRuns::ListingId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ListingTaskRuns::TaskRunId)
                            .col(ListingTaskRuns::ListingId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingSnapshots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ListingSnapshots::ListingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingSnapshots::SnapshotType)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingSnapshots::Data)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingSnapshots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingSnapshots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ListingTaskRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskRuns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TaskRuns {
    Table,
    Id,
    TaskId,
    Url,
    AuctioneerName,
    Stats,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Listings {
    Table,
    Id,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ListingTaskRuns {
    Table,
    TaskRunId,
    ListingId,
}

#[derive(DeriveIden)]
enum ListingSnapshots {
    Table,
    Id,
    ListingId,
    SnapshotType,
    Data,
    CreatedAt,
}
