use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoadTrafficOverall::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoadTrafficOverall::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoadTrafficOverall::RequestTime)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadTrafficOverall::RoadName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadTrafficOverall::City)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RoadTrafficOverall::ApiStatus).integer().null())
                    .col(ColumnDef::new(RoadTrafficOverall::Message).string_len(255).null())
                    .col(ColumnDef::new(RoadTrafficOverall::Description).text().null())
                    .col(
                        ColumnDef::new(RoadTrafficOverall::EvaluationStatus)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RoadTrafficOverall::EvaluationStatusDesc)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RoadTrafficOverall::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoadTrafficOverall::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RoadTrafficOverall {
    Table,
    Id,
    RequestTime,
    RoadName,
    City,
    ApiStatus,
    Message,
    Description,
    EvaluationStatus,
    EvaluationStatusDesc,
    CreatedAt,
}
