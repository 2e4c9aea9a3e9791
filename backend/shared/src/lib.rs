pub mod models;

pub use models::{
    CongestionLevel, CongestionSection, Evaluation, RoadReading, RoadSegment,
    TrafficQuery, TrafficResponse, TrafficStats, PROVIDER_STATUS_OK,
};
