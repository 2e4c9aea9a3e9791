use sea_orm_migration::prelude::*;
use std::env;
use std::process::ExitCode;

use migration::Migrator;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL must be set");
        return ExitCode::FAILURE;
    };

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("up");

    let db = match sea_orm::Database::connect(&db_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        "up" => Migrator::up(&db, None)
            .await
            .map(|_| println!("✓ Migrations applied successfully")),
        "down" => Migrator::down(&db, None)
            .await
            .map(|_| println!("✓ Migration rolled back successfully")),
        "fresh" => Migrator::fresh(&db)
            .await
            .map(|_| println!("✓ Fresh migrations applied successfully")),
        "status" => Migrator::status(&db).await,
        _ => {
            eprintln!("Unknown command: {}. Use: up, down, fresh, or status", command);
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Migration command '{}' failed: {}", command, e);
            ExitCode::FAILURE
        }
    }
}
