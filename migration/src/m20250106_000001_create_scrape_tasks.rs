use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create scrape_tasks table
        manager
            .create_table(
                Table::create()
                    .table(ScrapeTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeTasks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeTasks::Site).text().not_null())
                    .col(ColumnDef::new(ScrapeTasks::Url).text().not_null())
                    .col(ColumnDef::new(ScrapeTasks::TaskType).text().not_null())
                    .col(ColumnDef::new(ScrapeTasks::Status).text().not_null())
                    .col(ColumnDef::new(ScrapeTasks::ScheduledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ScrapeTasks::LockedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ScrapeTasks::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapeTasks::MaxAttempts)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(ScrapeTasks::LastError).text())
                    .col(ColumnDef::new(ScrapeTasks::Meta).json_binary().not_null())
                    .col(
                        ColumnDef::new(ScrapeTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeTasks::UpdatedAt)
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
            .drop_table(Table::drop().table(ScrapeTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeTasks {
    Table,
    Id,
    Site,
    Url,
    TaskType,
    Status,
    ScheduledAt,
    LockedAt,
    Attempts,
    MaxAttempts,
    LastError,
    Meta,
    CreatedAt,
    UpdatedAt,
}
