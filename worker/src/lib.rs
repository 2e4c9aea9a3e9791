pub mod config;
pub mod monitor;

pub use config::{Config, DatabaseConfig};
pub use monitor::{CycleReport, Pacing, TrafficMonitor};
