use async_trait::async_trait;
use chrono::Utc;
use road_watch_shared::{TrafficQuery, TrafficResponse};

use crate::error::{PersistError, StoreError};
use crate::store::{Connector, NewOverall, NewSection, StoreConnection, StoreTransaction};

/// Destination for fetched traffic readings.
#[async_trait]
pub trait TrafficSink: Send + Sync {
    /// Stores one reading, returning the generated `overall_id`.
    async fn persist(
        &self,
        query: &TrafficQuery,
        response: Option<&TrafficResponse>,
    ) -> Result<i64, PersistError>;
}

/// Writes each reading in its own transaction on its own connection.
pub struct TrafficPersister<C> {
    connector: C,
}

impl<C: Connector> TrafficPersister<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    async fn write(
        conn: &C::Connection,
        query: &TrafficQuery,
        response: &TrafficResponse,
    ) -> Result<i64, StoreError> {
        let txn = conn.begin().await?;

        match Self::insert_rows(&txn, query, response).await {
            Ok(overall_id) => {
                txn.commit().await?;
                Ok(overall_id)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    log::warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn insert_rows<T: StoreTransaction>(
        txn: &T,
        query: &TrafficQuery,
        response: &TrafficResponse,
    ) -> Result<i64, StoreError> {
        let overall = NewOverall::from_response(query, response, Utc::now());
        let overall_id = txn.insert_overall(&overall).await?;

        for section in NewSection::rows_for(overall_id, response) {
            txn.insert_section(&section).await?;
        }

        Ok(overall_id)
    }
}

#[async_trait]
impl<C: Connector> TrafficSink for TrafficPersister<C> {
    async fn persist(
        &self,
        query: &TrafficQuery,
        response: Option<&TrafficResponse>,
    ) -> Result<i64, PersistError> {
        let Some(response) = response else {
            log::error!("API data for {} is empty, nothing to save", query.road_name);
            return Err(PersistError::EmptyResponse);
        };

        if !response.is_success() {
            let err = PersistError::ProviderStatus {
                status: response.status,
                message: response.message.clone(),
            };
            log::error!("Traffic API returned an error for {}: {}", query.road_name, err);
            return Err(err);
        }

        let conn = match self.connector.connect().await {
            Ok(conn) => conn,
            Err(e) => {
                log::error!("Database connection failed: {}", e);
                return Err(PersistError::Connect(e));
            }
        };

        let result = Self::write(&conn, query, response).await;

        if let Err(e) = conn.close().await {
            log::warn!("Failed to close database connection: {}", e);
        }

        match result {
            Ok(overall_id) => {
                log::info!(
                    "Saved traffic data for {} ({}), overall id {}",
                    query.road_name,
                    query.city,
                    overall_id
                );
                Ok(overall_id)
            }
            Err(e) => {
                log::error!("Failed to save traffic data for {}: {}", query.road_name, e);
                Err(PersistError::Write(e))
            }
        }
    }
}
