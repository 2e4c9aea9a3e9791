use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use anyhow::Result;

pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    Ok(db)
}

/// A pool of exactly one connection, for a single unit of work.
pub async fn connect_single(database_url: &str) -> std::result::Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(1)
        .min_connections(0)
        .sqlx_logging(false);

    Database::connect(options).await
}

// Note: the two tables are normally created ahead of time. For a fresh
// database run the migration CLI:
// cargo run --bin migration up
