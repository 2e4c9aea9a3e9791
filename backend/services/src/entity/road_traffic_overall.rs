use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "road_traffic_overall")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub request_time: DateTimeWithTimeZone,
    pub road_name: String,
    pub city: String,
    pub api_status: Option<i32>,
    pub message: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub evaluation_status: Option<i32>,
    pub evaluation_status_desc: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::congestion_sections::Entity")]
    CongestionSections,
}

impl Related<super::congestion_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CongestionSections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
