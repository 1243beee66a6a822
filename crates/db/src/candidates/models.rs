use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One train leg of a candidate journey, as produced by the schedule query
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateLeg {
    pub train_id: i64,
    pub train_no: String,
    pub dep_code: String,
    pub arr_code: String,
    pub dep_time: DateTime<Utc>,
    pub arr_time: DateTime<Utc>,
}

/// A raw route candidate: 1 leg (direct), 2 legs (one transfer) or 3 legs
/// (two transfers). `transfer_stations` carries the display name of each
/// transfer point, one per leg boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub legs: Vec<CandidateLeg>,
    pub transfer_stations: Vec<String>,
}

impl RouteCandidate {
    pub fn transfers(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }
}

/// Search bounds for candidate generation.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub from_name: String,
    pub to_name: String,
    pub now: DateTime<Utc>,
    pub latest_arrival: DateTime<Utc>,
    pub min_transfer_min: i64,
    pub max_total_hours: i64,
    pub limit: i64,
}
