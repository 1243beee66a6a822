use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AggregationPolicy, ScoringConfig};
use crate::leg::{LegExplain, LegScorer};
use crate::predictor::DelayPredictor;
use crate::segment::Segment;
use railcast_common::error::RailcastResult;
use railcast_db::candidates::models::RouteCandidate;
use railcast_db::history::repositories::DelayHistoryRepository;

/// Combine per-leg on-time probabilities into one route probability.
///
/// An empty leg list yields 0.0, never NaN.
pub fn aggregate(probs: &[f64], policy: AggregationPolicy) -> f64 {
    if probs.is_empty() {
        return 0.0;
    }
    match policy {
        AggregationPolicy::Min => probs.iter().copied().fold(f64::INFINITY, f64::min),
        AggregationPolicy::Product => probs.iter().product(),
    }
}

/// One transfer point of a scored route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferInfo {
    pub station: String,
    pub wait_min: f64,
}

/// A scored leg with its train identity and timing.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRouteLeg {
    pub train_id: i64,
    pub train_no: String,
    pub dep_code: String,
    pub arr_code: String,
    pub dep_time: DateTime<Utc>,
    pub arr_time: DateTime<Utc>,
    pub probability: f64,
    pub explain: LegExplain,
}

/// A fully scored route candidate. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRoute {
    pub transfers: usize,
    pub probability: f64,
    pub legs: Vec<ScoredRouteLeg>,
    pub transfer_info: Vec<TransferInfo>,
    pub has_risky_station: bool,
}

impl ScoredRoute {
    pub fn departure_time(&self) -> Option<DateTime<Utc>> {
        self.legs.first().map(|l| l.dep_time)
    }

    pub fn arrival_time(&self) -> Option<DateTime<Utc>> {
        self.legs.last().map(|l| l.arr_time)
    }

    /// Tightest transfer wait, `None` on direct routes.
    pub fn min_transfer_wait(&self) -> Option<f64> {
        self.transfer_info
            .iter()
            .map(|t| t.wait_min)
            .fold(None, |acc, w| Some(acc.map_or(w, |a: f64| a.min(w))))
    }
}

/// Scores a whole candidate: every leg against the deadline, then the
/// configured aggregation, transfer waits and the risky-station flag.
pub struct RouteScorer<'a, H, P> {
    history: &'a H,
    predictor: &'a P,
    config: &'a ScoringConfig,
}

impl<'a, H, P> RouteScorer<'a, H, P>
where
    H: DelayHistoryRepository,
    P: DelayPredictor,
{
    pub fn new(history: &'a H, predictor: &'a P, config: &'a ScoringConfig) -> Self {
        Self {
            history,
            predictor,
            config,
        }
    }

    pub async fn score(
        &self,
        candidate: &RouteCandidate,
        deadline: DateTime<Utc>,
    ) -> RailcastResult<ScoredRoute> {
        let leg_scorer = LegScorer::new(self.history, self.predictor, self.config);

        let mut legs = Vec::with_capacity(candidate.legs.len());
        let mut probs = Vec::with_capacity(candidate.legs.len());

        for leg in &candidate.legs {
            let segment = Segment::new(&leg.dep_code, &leg.arr_code);
            let scored = leg_scorer.score(&segment, leg.arr_time, deadline).await?;
            probs.push(scored.probability);
            legs.push(ScoredRouteLeg {
                train_id: leg.train_id,
                train_no: leg.train_no.clone(),
                dep_code: leg.dep_code.clone(),
                arr_code: leg.arr_code.clone(),
                dep_time: leg.dep_time,
                arr_time: leg.arr_time,
                probability: scored.probability,
                explain: scored.explain,
            });
        }

        let probability = aggregate(&probs, self.config.aggregation);

        let transfer_info = candidate
            .legs
            .windows(2)
            .enumerate()
            .map(|(i, pair)| TransferInfo {
                station: candidate
                    .transfer_stations
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| pair[0].arr_code.clone()),
                wait_min: (pair[1].dep_time - pair[0].arr_time).num_seconds() as f64 / 60.0,
            })
            .collect();

        let has_risky_station = legs.iter().any(|l| l.explain.is_risky_segment);

        Ok(ScoredRoute {
            transfers: candidate.transfers(),
            probability,
            legs,
            transfer_info,
            has_risky_station,
        })
    }
}
