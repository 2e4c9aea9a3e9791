use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use chrono::{DateTime, Utc};
use anyhow::Result;
use road_watch_shared::{RoadReading, TrafficStats};
use crate::entity::{congestion_sections, road_traffic_overall};

/// Read side over the stored traffic readings.
pub struct TrafficQueryService {
    db: DatabaseConnection,
}

/// Aggregates over the sections of one reading.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSummary {
    pub sections: usize,
    pub average_speed: Option<f64>,
    /// Meters.
    pub total_congestion_distance: i64,
}

impl TrafficQueryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get the newest reading of every (road, city) pair
    pub async fn latest_for_each_road(&self) -> Result<Vec<RoadReading>> {
        let latest_ids: Vec<i64> = road_traffic_overall::Entity::find()
            .select_only()
            .column_as(road_traffic_overall::Column::Id.max(), "id")
            .group_by(road_traffic_overall::Column::RoadName)
            .group_by(road_traffic_overall::Column::City)
            .into_tuple()
            .all(&self.db)
            .await?;

        if latest_ids.is_empty() {
            return Ok(Vec::new());
        }

        let readings = road_traffic_overall::Entity::find()
            .filter(road_traffic_overall::Column::Id.is_in(latest_ids))
            .order_by_desc(road_traffic_overall::Column::RequestTime)
            .all(&self.db)
            .await?;

        Ok(readings.iter().map(Self::entity_to_reading).collect())
    }

    /// Get readings of one road within a time range, newest first
    pub async fn history_for_road(
        &self,
        road_name: &str,
        city: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<RoadReading>> {
        let mut query = road_traffic_overall::Entity::find()
            .filter(road_traffic_overall::Column::RoadName.eq(road_name))
            .filter(road_traffic_overall::Column::City.eq(city));

        if let Some(from_dt) = from {
            query = query.filter(road_traffic_overall::Column::RequestTime.gte(from_dt.fixed_offset()));
        }

        if let Some(to_dt) = to {
            query = query.filter(road_traffic_overall::Column::RequestTime.lte(to_dt.fixed_offset()));
        }

        query = query.order_by_desc(road_traffic_overall::Column::RequestTime);

        if let Some(limit_val) = limit {
            query = query.limit(limit_val);
        }

        let readings = query.all(&self.db).await?;

        Ok(readings.iter().map(Self::entity_to_reading).collect())
    }

    /// Get readings of every road in a city, newest first
    pub async fn readings_for_city(&self, city: &str, limit: Option<u64>) -> Result<Vec<RoadReading>> {
        let mut query = road_traffic_overall::Entity::find()
            .filter(road_traffic_overall::Column::City.eq(city))
            .order_by_desc(road_traffic_overall::Column::RequestTime);

        if let Some(limit_val) = limit {
            query = query.limit(limit_val);
        }

        let readings = query.all(&self.db).await?;

        Ok(readings.iter().map(Self::entity_to_reading).collect())
    }

    /// Get readings with the given evaluation status, newest first
    pub async fn readings_with_status(&self, evaluation_status: i32) -> Result<Vec<RoadReading>> {
        let readings = road_traffic_overall::Entity::find()
            .filter(road_traffic_overall::Column::EvaluationStatus.eq(evaluation_status))
            .order_by_desc(road_traffic_overall::Column::RequestTime)
            .all(&self.db)
            .await?;

        Ok(readings.iter().map(Self::entity_to_reading).collect())
    }

    /// Get readings whose road or city contains `keyword`, newest first
    pub async fn search(&self, keyword: &str) -> Result<Vec<RoadReading>> {
        let readings = road_traffic_overall::Entity::find()
            .filter(
                Condition::any()
                    .add(road_traffic_overall::Column::RoadName.contains(keyword))
                    .add(road_traffic_overall::Column::City.contains(keyword)),
            )
            .order_by_desc(road_traffic_overall::Column::RequestTime)
            .all(&self.db)
            .await?;

        Ok(readings.iter().map(Self::entity_to_reading).collect())
    }

    /// Get the congestion sections stored with one reading, in insert order
    pub async fn sections_for(&self, overall_id: i64) -> Result<Vec<congestion_sections::Model>> {
        let sections = congestion_sections::Entity::find()
            .filter(congestion_sections::Column::OverallId.eq(overall_id))
            .order_by_asc(congestion_sections::Column::Id)
            .all(&self.db)
            .await?;

        Ok(sections)
    }

    pub async fn section_summary(&self, overall_id: i64) -> Result<SectionSummary> {
        let sections = self.sections_for(overall_id).await?;
        Ok(Self::summarize_sections(&sections))
    }

    /// Count readings by evaluation status since a point in time
    pub async fn stats_since(&self, since: DateTime<Utc>) -> Result<TrafficStats> {
        let counts: Vec<(Option<i32>, i64)> = road_traffic_overall::Entity::find()
            .select_only()
            .column(road_traffic_overall::Column::EvaluationStatus)
            .column_as(road_traffic_overall::Column::Id.count(), "readings")
            .filter(road_traffic_overall::Column::RequestTime.gte(since.fixed_offset()))
            .group_by(road_traffic_overall::Column::EvaluationStatus)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(TrafficStats::from_counts(since, counts))
    }

    // Helper: averages ignore sections without a speed
    fn summarize_sections(sections: &[congestion_sections::Model]) -> SectionSummary {
        let speeds: Vec<f64> = sections.iter().filter_map(|s| s.speed).collect();
        let average_speed = if speeds.is_empty() {
            None
        } else {
            Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
        };

        SectionSummary {
            sections: sections.len(),
            average_speed,
            total_congestion_distance: sections
                .iter()
                .filter_map(|s| s.congestion_distance)
                .map(i64::from)
                .sum(),
        }
    }

    // Helper: Convert entity to RoadReading
    fn entity_to_reading(entity: &road_traffic_overall::Model) -> RoadReading {
        RoadReading {
            overall_id: entity.id,
            road_name: entity.road_name.clone(),
            city: entity.city.clone(),
            evaluation_status: entity.evaluation_status,
            evaluation_status_desc: entity.evaluation_status_desc.clone(),
            description: entity.description.clone(),
            request_time: entity.request_time.with_timezone(&Utc),
        }
    }
}
