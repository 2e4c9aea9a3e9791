use road_watch_services::{SeaOrmConnector, TrafficFetcher, TrafficPersister};
use road_watch_worker::{Config, TrafficMonitor};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;

    log::info!("Starting road traffic worker");
    log::info!("Saving readings to {}", config.database.describe());
    if config.roads.is_empty() {
        log::warn!("No roads configured, cycles will be empty");
    }

    let fetcher = TrafficFetcher::new(config.fetcher_config())?;
    let persister = TrafficPersister::new(SeaOrmConnector::new(config.database.url()));
    let monitor = TrafficMonitor::new(fetcher, persister, config.roads.clone(), config.pacing);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Shutdown requested, finishing current road");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => log::error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    monitor.run(shutdown_rx).await;

    Ok(())
}
