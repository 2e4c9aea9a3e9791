use anyhow::{anyhow, Context};
use chrono::{Duration, Utc};
use road_watch_services::{create_connection, TrafficQueryService};
use road_watch_shared::RoadReading;
use road_watch_worker::DatabaseConfig;
use std::env;

const USAGE: &str = "Usage: traffic-report [history <road> <city> [hours] | city <city> | status <level> | search <keyword>]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let database = DatabaseConfig::from_env()?;
    let db = create_connection(&database.url()).await?;
    let service = TrafficQueryService::new(db);

    match args.as_slice() {
        [] => overview(&service).await,
        ["history", road, city, rest @ ..] => {
            let hours = match rest.first() {
                Some(hours) => hours
                    .parse()
                    .with_context(|| format!("hours must be a whole number, got {}", hours))?,
                None => 24,
            };
            let to = Utc::now();
            let readings = service
                .history_for_road(road, city, Some(to - Duration::hours(hours)), Some(to), Some(100))
                .await?;
            print_readings(&format!("{} {} over the last {} hours", city, road, hours), &readings);
            Ok(())
        }
        ["city", city] => {
            let readings = service.readings_for_city(city, Some(100)).await?;
            print_readings(&format!("Readings in {}", city), &readings);
            Ok(())
        }
        ["status", level] => {
            let level = level
                .parse()
                .with_context(|| format!("status must be a number, got {}", level))?;
            let readings = service.readings_with_status(level).await?;
            print_readings(&format!("Readings with status {}", level), &readings);
            Ok(())
        }
        ["search", keyword] => {
            let readings = service.search(keyword).await?;
            print_readings(&format!("Readings matching {:?}", keyword), &readings);
            Ok(())
        }
        _ => Err(anyhow!(USAGE)),
    }
}

async fn overview(service: &TrafficQueryService) -> anyhow::Result<()> {
    let latest = service.latest_for_each_road().await?;
    println!("Latest readings ({} roads)", latest.len());
    for reading in &latest {
        let summary = service.section_summary(reading.overall_id).await?;
        let speed = summary
            .average_speed
            .map(|s| format!("{:.1} km/h", s))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {} {} [{}] {} congested sections, avg speed {}, {:.1} km congested, at {}",
            reading.city,
            reading.road_name,
            reading.evaluation_status_desc.as_deref().unwrap_or("unknown"),
            summary.sections,
            speed,
            summary.total_congestion_distance as f64 / 1000.0,
            reading.request_time.format("%Y-%m-%d %H:%M:%S"),
        );
    }

    let stats = service.stats_since(Utc::now() - Duration::hours(24)).await?;
    println!();
    println!("Last 24 hours: {} readings", stats.total);
    println!("  smooth:    {}", stats.smooth);
    println!("  slow:      {}", stats.slow);
    println!("  congested: {}", stats.congested);
    println!("  heavy:     {}", stats.heavy);
    if let Some(unknown) = stats.distribution.get("unknown") {
        println!("  unknown:   {}", unknown);
    }

    Ok(())
}

fn print_readings(title: &str, readings: &[RoadReading]) {
    println!("{} ({} readings)", title, readings.len());
    for reading in readings {
        println!(
            "  {} {} {} [{}] {}",
            reading.request_time.format("%Y-%m-%d %H:%M:%S"),
            reading.city,
            reading.road_name,
            reading.evaluation_status_desc.as_deref().unwrap_or("unknown"),
            reading.description.as_deref().unwrap_or(""),
        );
    }
}
