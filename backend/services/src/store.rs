use async_trait::async_trait;
use chrono::{DateTime, Utc};
use road_watch_shared::{TrafficQuery, TrafficResponse};
use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait};

use crate::database::connect_single;
use crate::entity::{congestion_sections, road_traffic_overall};
use crate::error::StoreError;

/// Row for `road_traffic_overall`, before the database assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOverall {
    pub road_name: String,
    pub city: String,
    pub api_status: i32,
    pub message: Option<String>,
    pub description: Option<String>,
    pub evaluation_status: Option<i32>,
    pub evaluation_status_desc: Option<String>,
    pub request_time: DateTime<Utc>,
}

impl NewOverall {
    pub fn from_response(
        query: &TrafficQuery,
        response: &TrafficResponse,
        request_time: DateTime<Utc>,
    ) -> Self {
        Self {
            road_name: query.road_name.clone(),
            city: query.city.clone(),
            api_status: response.status,
            message: response.message.clone(),
            description: response.description.clone(),
            evaluation_status: response.evaluation_status(),
            evaluation_status_desc: response.evaluation_status_desc().map(str::to_string),
            request_time,
        }
    }
}

/// Row for `congestion_sections`, owned by an overall row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSection {
    pub overall_id: i64,
    pub road_name: Option<String>,
    pub section_desc: Option<String>,
    pub status: Option<i32>,
    pub speed: Option<f64>,
    pub congestion_distance: Option<i32>,
    pub congestion_trend: Option<String>,
}

impl NewSection {
    /// One row per section, segments and sections in response order.
    pub fn rows_for(overall_id: i64, response: &TrafficResponse) -> Vec<NewSection> {
        response
            .road_traffic
            .iter()
            .flat_map(|segment| {
                segment.congestion_sections.iter().map(move |section| NewSection {
                    overall_id,
                    road_name: segment.road_name.clone(),
                    section_desc: section.section_desc.clone(),
                    status: section.status,
                    speed: section.speed,
                    congestion_distance: section.congestion_distance,
                    congestion_trend: section.congestion_trend.clone(),
                })
            })
            .collect()
    }
}

/// Opens a fresh connection for each unit of work.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: StoreConnection;

    async fn connect(&self) -> Result<Self::Connection, StoreError>;
}

#[async_trait]
pub trait StoreConnection: Send + Sync {
    type Transaction: StoreTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError>;

    async fn close(self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait StoreTransaction: Send + Sync {
    /// Returns the generated `overall_id`.
    async fn insert_overall(&self, row: &NewOverall) -> Result<i64, StoreError>;

    async fn insert_section(&self, row: &NewSection) -> Result<i64, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

pub struct SeaOrmConnector {
    database_url: String,
}

impl SeaOrmConnector {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

#[async_trait]
impl Connector for SeaOrmConnector {
    type Connection = SeaOrmConnection;

    async fn connect(&self) -> Result<SeaOrmConnection, StoreError> {
        let db = connect_single(&self.database_url).await?;
        Ok(SeaOrmConnection::new(db))
    }
}

pub struct SeaOrmConnection {
    db: DatabaseConnection,
}

impl SeaOrmConnection {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreConnection for SeaOrmConnection {
    type Transaction = SeaOrmTransaction;

    async fn begin(&self) -> Result<SeaOrmTransaction, StoreError> {
        let txn = self.db.begin().await?;
        Ok(SeaOrmTransaction { txn })
    }

    async fn close(self) -> Result<(), StoreError> {
        self.db.close().await?;
        Ok(())
    }
}

pub struct SeaOrmTransaction {
    txn: DatabaseTransaction,
}

#[async_trait]
impl StoreTransaction for SeaOrmTransaction {
    async fn insert_overall(&self, row: &NewOverall) -> Result<i64, StoreError> {
        use sea_orm::ActiveValue::Set;

        let model = road_traffic_overall::ActiveModel {
            request_time: Set(row.request_time.fixed_offset()),
            road_name: Set(row.road_name.clone()),
            city: Set(row.city.clone()),
            api_status: Set(Some(row.api_status)),
            message: Set(row.message.clone()),
            description: Set(row.description.clone()),
            evaluation_status: Set(row.evaluation_status),
            evaluation_status_desc: Set(row.evaluation_status_desc.clone()),
            ..Default::default()
        };

        let result = road_traffic_overall::Entity::insert(model)
            .exec(&self.txn)
            .await?;

        Ok(result.last_insert_id)
    }

    async fn insert_section(&self, row: &NewSection) -> Result<i64, StoreError> {
        use sea_orm::ActiveValue::Set;

        let model = congestion_sections::ActiveModel {
            overall_id: Set(row.overall_id),
            road_name: Set(row.road_name.clone()),
            section_desc: Set(row.section_desc.clone()),
            status: Set(row.status),
            speed: Set(row.speed),
            congestion_distance: Set(row.congestion_distance),
            congestion_trend: Set(row.congestion_trend.clone()),
            ..Default::default()
        };

        let result = congestion_sections::Entity::insert(model)
            .exec(&self.txn)
            .await?;

        Ok(result.last_insert_id)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.txn.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn response() -> TrafficResponse {
        serde_json::from_str(
            r#"{"status":0,"message":"ok","description":"d",
                "evaluation":{"status":3,"status_desc":"拥堵"},
                "road_traffic":[
                    {"road_name":"四平路","congestion_sections":[
                        {"section_desc":"大连路-临平路","status":3,"speed":9.5,"congestion_distance":420,"congestion_trend":"加重"},
                        {"section_desc":"临平路-海伦路","status":2,"speed":18.0,"congestion_distance":150,"congestion_trend":"持平"}]},
                    {"road_name":"四平路辅路","congestion_sections":[
                        {"section_desc":"辅路段","status":2,"speed":20.0,"congestion_distance":80,"congestion_trend":"缓解"}]}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn overall_row_copies_query_and_evaluation() {
        let now = Utc::now();
        let row = NewOverall::from_response(&TrafficQuery::new("四平路", "上海市"), &response(), now);

        assert_eq!(row.road_name, "四平路");
        assert_eq!(row.city, "上海市");
        assert_eq!(row.api_status, 0);
        assert_eq!(row.evaluation_status, Some(3));
        assert_eq!(row.evaluation_status_desc.as_deref(), Some("拥堵"));
        assert_eq!(row.request_time, now);
    }

    #[test]
    fn section_rows_follow_segment_order() {
        let rows = NewSection::rows_for(7, &response());

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.overall_id == 7));
        assert_eq!(rows[0].section_desc.as_deref(), Some("大连路-临平路"));
        assert_eq!(rows[1].road_name.as_deref(), Some("四平路"));
        assert_eq!(rows[2].road_name.as_deref(), Some("四平路辅路"));
        assert_eq!(rows[2].congestion_trend.as_deref(), Some("缓解"));
    }

    #[tokio::test]
    async fn sea_orm_transaction_returns_generated_ids() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 42,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 100,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let conn = SeaOrmConnection::new(db);

        let txn = conn.begin().await.unwrap();
        let overall = NewOverall::from_response(&TrafficQuery::new("四平路", "上海市"), &response(), Utc::now());
        let overall_id = txn.insert_overall(&overall).await.unwrap();
        assert_eq!(overall_id, 42);

        let section = NewSection::rows_for(overall_id, &response()).remove(0);
        assert_eq!(txn.insert_section(&section).await.unwrap(), 100);

        txn.commit().await.unwrap();
    }

    #[tokio::test]
    async fn sea_orm_insert_errors_surface_as_store_errors() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_errors([DbErr::Custom("duplicate key".to_string())])
            .into_connection();
        let conn = SeaOrmConnection::new(db);

        let txn = conn.begin().await.unwrap();
        let overall = NewOverall::from_response(&TrafficQuery::new("四平路", "上海市"), &response(), Utc::now());
        let err = txn.insert_overall(&overall).await.unwrap_err();

        assert!(matches!(err, StoreError::Db(DbErr::Custom(ref msg)) if msg == "duplicate key"));
        txn.rollback().await.unwrap();
    }
}
