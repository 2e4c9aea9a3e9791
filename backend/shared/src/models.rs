use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Provider-side success sentinel for the top-level `status` field.
pub const PROVIDER_STATUS_OK: i32 = 0;

/// One monitored (road, city) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficQuery {
    pub road_name: String,
    pub city: String,
}

impl TrafficQuery {
    pub fn new(road_name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            road_name: road_name.into(),
            city: city.into(),
        }
    }
}

/// Body returned by the road traffic endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficResponse {
    pub status: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub road_traffic: Vec<RoadSegment>,
}

impl TrafficResponse {
    pub fn is_success(&self) -> bool {
        self.status == PROVIDER_STATUS_OK
    }

    pub fn evaluation_status(&self) -> Option<i32> {
        self.evaluation.as_ref().and_then(|e| e.status)
    }

    pub fn evaluation_status_desc(&self) -> Option<&str> {
        self.evaluation.as_ref().and_then(|e| e.status_desc.as_deref())
    }

    /// Number of congestion sections across every segment.
    pub fn section_count(&self) -> usize {
        self.road_traffic
            .iter()
            .map(|segment| segment.congestion_sections.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub status_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    #[serde(default)]
    pub road_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub congestion_sections: Vec<CongestionSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongestionSection {
    #[serde(default)]
    pub section_desc: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub congestion_distance: Option<i32>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub congestion_trend: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

// The provider has sent congestion_trend both as a label and as a code.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Int(code) => code.to_string(),
        TextOrNumber::Float(code) => code.to_string(),
    }))
}

/// Congestion level carried by `evaluation.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CongestionLevel {
    Unknown,
    Smooth,
    Slow,
    Congested,
    Heavy,
}

impl CongestionLevel {
    pub fn from_status(status: Option<i32>) -> Self {
        match status {
            Some(0) | Some(1) => CongestionLevel::Smooth,
            Some(2) => CongestionLevel::Slow,
            Some(3) => CongestionLevel::Congested,
            Some(4) => CongestionLevel::Heavy,
            _ => CongestionLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CongestionLevel::Unknown => "unknown",
            CongestionLevel::Smooth => "smooth",
            CongestionLevel::Slow => "slow",
            CongestionLevel::Congested => "congested",
            CongestionLevel::Heavy => "heavy",
        }
    }
}

/// Distribution of overall readings by congestion level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficStats {
    pub total: i64,
    pub smooth: i64,
    pub slow: i64,
    pub congested: i64,
    pub heavy: i64,
    pub distribution: BTreeMap<String, i64>,
    pub since: DateTime<Utc>,
}

impl TrafficStats {
    /// Folds `(evaluation_status, count)` pairs into per-level totals.
    pub fn from_counts<I>(since: DateTime<Utc>, counts: I) -> Self
    where
        I: IntoIterator<Item = (Option<i32>, i64)>,
    {
        let mut stats = TrafficStats {
            total: 0,
            smooth: 0,
            slow: 0,
            congested: 0,
            heavy: 0,
            distribution: BTreeMap::new(),
            since,
        };

        for (status, count) in counts {
            let level = CongestionLevel::from_status(status);
            stats.total += count;
            *stats.distribution.entry(level.as_str().to_string()).or_insert(0) += count;

            match level {
                CongestionLevel::Smooth => stats.smooth += count,
                CongestionLevel::Slow => stats.slow += count,
                CongestionLevel::Congested => stats.congested += count,
                CongestionLevel::Heavy => stats.heavy += count,
                CongestionLevel::Unknown => {}
            }
        }

        stats
    }
}

/// Latest stored reading for one (road, city) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadReading {
    pub overall_id: i64,
    pub road_name: String,
    pub city: String,
    pub evaluation_status: Option<i32>,
    pub evaluation_status_desc: Option<String>,
    pub description: Option<String>,
    pub request_time: DateTime<Utc>,
}
