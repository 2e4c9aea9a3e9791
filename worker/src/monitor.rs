use road_watch_services::{TrafficSink, TrafficSource};
use road_watch_shared::TrafficQuery;
use std::time::Duration;
use tokio::sync::watch;

/// Fixed pauses between requests and between passes over the road list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub entry_delay: Duration,
    pub cycle_interval: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            entry_delay: Duration::from_secs(2),
            cycle_interval: Duration::from_secs(300),
        }
    }
}

/// Outcome of one pass over the road list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub attempted: usize,
    pub stored: usize,
    pub failed: usize,
}

/// Polls every road in order, then waits, until told to stop.
pub struct TrafficMonitor<S, K> {
    source: S,
    sink: K,
    roads: Vec<TrafficQuery>,
    pacing: Pacing,
}

impl<S: TrafficSource, K: TrafficSink> TrafficMonitor<S, K> {
    pub fn new(source: S, sink: K, roads: Vec<TrafficQuery>, pacing: Pacing) -> Self {
        Self {
            source,
            sink,
            roads,
            pacing,
        }
    }

    /// Runs until `shutdown` flips to `true` and returns the number of
    /// completed passes.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> u64 {
        log::info!("Traffic monitor starting:");
        log::info!("  - Roads: {}", self.roads.len());
        log::info!("  - Delay between roads: {:?}", self.pacing.entry_delay);
        log::info!("  - Delay between cycles: {:?}", self.pacing.cycle_interval);

        let mut passes = 0;
        loop {
            let Some(report) = self.pass(&mut shutdown).await else {
                break;
            };
            passes += 1;

            log::info!(
                "Cycle complete: {}/{} roads saved, {} failed. Next cycle in {:?}",
                report.stored,
                report.attempted,
                report.failed,
                self.pacing.cycle_interval
            );

            if pause(self.pacing.cycle_interval, &mut shutdown).await {
                break;
            }
        }

        log::info!("Traffic monitor stopped after {} completed cycles", passes);
        passes
    }

    /// One full pass, including the delay after each road.
    pub async fn run_cycle(&self) -> CycleReport {
        let (_keep_open, mut shutdown) = watch::channel(false);
        self.pass(&mut shutdown).await.unwrap_or_default()
    }

    // None when interrupted before the pass finished
    async fn pass(&self, shutdown: &mut watch::Receiver<bool>) -> Option<CycleReport> {
        let mut report = CycleReport::default();

        for query in &self.roads {
            if *shutdown.borrow() {
                return None;
            }

            report.attempted += 1;
            if self.visit(query).await {
                report.stored += 1;
            } else {
                report.failed += 1;
            }

            if pause(self.pacing.entry_delay, shutdown).await {
                return None;
            }
        }

        Some(report)
    }

    async fn visit(&self, query: &TrafficQuery) -> bool {
        log::info!("Fetching traffic for {} - {}", query.city, query.road_name);

        let Some(response) = self.source.fetch(query).await else {
            log::error!("{}: no traffic data this cycle", query.road_name);
            return false;
        };

        match self.sink.persist(query, Some(&response)).await {
            Ok(_) => {
                log::info!("{}: traffic data fetched and saved", query.road_name);
                true
            }
            Err(e) if e.is_rejected() => {
                log::warn!("{}: traffic data not saved: {}", query.road_name, e);
                false
            }
            Err(e) => {
                log::error!("{}: traffic data not saved: {}", query.road_name, e);
                false
            }
        }
    }
}

/// Sleeps for `duration`; returns `true` if shutdown was requested first.
async fn pause(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }

    let stop_requested = async {
        let sender_gone = shutdown.wait_for(|stop| *stop).await.is_err();
        if sender_gone {
            // Nobody can ask us to stop any more.
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = stop_requested => true,
    }
}
