use chrono::{DateTime, Utc};
use serde::Serialize;

use railcast_scoring::leg::LegExplain;
use railcast_scoring::ranker::RankedRoute;

/// Raw scored/ranked payload of `POST /recommend`.
#[derive(Debug, Serialize)]
pub struct RawRecommendResponse {
    pub from: String,
    pub to: String,
    pub now: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub route_agg: String,
    pub candidate_count: usize,
    pub results: Vec<RankedRoute>,
}

/// Presented payload of `POST /recommend/v2`.
#[derive(Debug, Serialize)]
pub struct RecommendResponseV2 {
    pub query: QueryEcho,
    pub meta: ResponseMeta,
    pub routes: Vec<RouteView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryEcho {
    pub from: String,
    pub to: String,
    pub now: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub max_transfers: u8,
    pub min_transfer_min: i64,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub candidate_count: usize,
    pub returned: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Med,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Med => "MED",
            Self::High => "HIGH",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RiskView {
    pub has_risky_station: bool,
    pub risky_stations: Vec<String>,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Serialize)]
pub struct TransferView {
    pub station: String,
    pub transfer_wait_min: f64,
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct LegView {
    pub train_id: i64,
    pub train_no: String,
    pub from_code: String,
    pub to_code: String,
    pub dep_time: DateTime<Utc>,
    pub arr_time: DateTime<Utc>,
    pub leg_duration_min: f64,
    pub leg_on_time_probability: f64,
    pub segment: String,
    pub segment_is_risky: bool,
}

/// Traceability block: aggregation policy plus each leg's explain record,
/// unchanged from scoring.
#[derive(Debug, Serialize)]
pub struct DebugView {
    pub agg: String,
    pub explain: Vec<LegExplain>,
}

#[derive(Debug, Serialize)]
pub struct RouteView {
    pub route_id: String,
    pub rank: usize,
    pub transfers: usize,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub total_duration_min: f64,
    pub arrival_slack_min: f64,
    pub on_time_probability: f64,
    pub risk: RiskView,
    pub transfer_summary: Vec<TransferView>,
    pub user_messages: Vec<String>,
    pub legs: Vec<LegView>,
    pub debug: DebugView,
}
