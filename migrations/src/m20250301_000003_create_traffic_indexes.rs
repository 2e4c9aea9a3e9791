use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_road_traffic_overall::RoadTrafficOverall;
use super::m20250301_000002_create_congestion_sections::CongestionSections;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Latest-per-road and history lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_road_traffic_overall_road_city")
                    .table(RoadTrafficOverall::Table)
                    .col(RoadTrafficOverall::RoadName)
                    .col(RoadTrafficOverall::City)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_road_traffic_overall_request_time")
                    .table(RoadTrafficOverall::Table)
                    .col(RoadTrafficOverall::RequestTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_congestion_sections_overall_id")
                    .table(CongestionSections::Table)
                    .col(CongestionSections::OverallId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_congestion_sections_overall_id")
                    .table(CongestionSections::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_road_traffic_overall_request_time")
                    .table(RoadTrafficOverall::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_road_traffic_overall_road_city")
                    .table(RoadTrafficOverall::Table)
                    .to_owned(),
            )
            .await
    }
}
