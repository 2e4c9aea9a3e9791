use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_road_traffic_overall::RoadTrafficOverall;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CongestionSections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CongestionSections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CongestionSections::OverallId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CongestionSections::RoadName).string_len(100).null())
                    .col(ColumnDef::new(CongestionSections::SectionDesc).string_len(500).null())
                    .col(ColumnDef::new(CongestionSections::Status).integer().null())
                    .col(ColumnDef::new(CongestionSections::Speed).double().null())
                    .col(
                        ColumnDef::new(CongestionSections::CongestionDistance)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CongestionSections::CongestionTrend)
                            .string_len(20)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CongestionSections::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_congestion_sections_overall_id")
                            .from(CongestionSections::Table, CongestionSections::OverallId)
                            .to(RoadTrafficOverall::Table, RoadTrafficOverall::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CongestionSections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CongestionSections {
    Table,
    Id,
    OverallId,
    RoadName,
    SectionDesc,
    Status,
    Speed,
    CongestionDistance,
    CongestionTrend,
    CreatedAt,
}
