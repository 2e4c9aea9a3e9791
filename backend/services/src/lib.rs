pub mod database;
pub mod entity;
pub mod error;
pub mod fetcher;
pub mod persister;
pub mod query_service;
pub mod store;

pub use database::{connect_single, create_connection};
pub use error::{FetchError, PersistError, StoreError};
pub use fetcher::{FetcherConfig, TrafficFetcher, TrafficSource};
pub use persister::{TrafficPersister, TrafficSink};
pub use query_service::{SectionSummary, TrafficQueryService};
pub use store::{
    Connector, NewOverall, NewSection, SeaOrmConnection, SeaOrmConnector, StoreConnection,
    StoreTransaction,
};

// Re-export entities for convenience
pub use entity::congestion_sections;
pub use entity::road_traffic_overall;
