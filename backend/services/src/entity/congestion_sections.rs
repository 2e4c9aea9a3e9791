use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "congestion_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub overall_id: i64,
    pub road_name: Option<String>,
    pub section_desc: Option<String>,
    pub status: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub speed: Option<f64>,
    pub congestion_distance: Option<i32>,
    pub congestion_trend: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::road_traffic_overall::Entity",
        from = "Column::OverallId",
        to = "super::road_traffic_overall::Column::Id",
        on_delete = "Cascade"
    )]
    RoadTrafficOverall,
}

impl Related<super::road_traffic_overall::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoadTrafficOverall.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
