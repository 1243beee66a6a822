use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::features::{build_model_input, floor_to_bucket};
use crate::predictor::DelayPredictor;
use crate::probability::mixture_cdf;
use crate::segment::Segment;
use crate::window::HistoryWindow;
use railcast_common::error::RailcastResult;
use railcast_db::history::repositories::DelayHistoryRepository;

/// Why a leg was scored without consulting the forecaster.
///
/// Both cases are degraded successes: the route keeps scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    UnknownSegment,
    DeadlinePassed,
}

impl DegradedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownSegment => "unknown_segment",
            Self::DeadlinePassed => "deadline_passed",
        }
    }
}

/// Per-leg explain record, echoed unchanged all the way to the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegExplain {
    pub segment: String,
    pub slack_min: f64,
    pub target_ts: DateTime<Utc>,
    pub is_risky_segment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<DegradedReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredLeg {
    pub segment: Segment,
    pub probability: f64,
    pub explain: LegExplain,
}

/// Scores one leg: history → padding → features → forecast → mixture CDF,
/// with tagged fallbacks for unknown segments and already-missed deadlines.
pub struct LegScorer<'a, H, P> {
    history: &'a H,
    predictor: &'a P,
    config: &'a ScoringConfig,
}

impl<'a, H, P> LegScorer<'a, H, P>
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
        segment: &Segment,
        planned_arrival: DateTime<Utc>,
        deadline: DateTime<Utc>,
    ) -> RailcastResult<ScoredLeg> {
        let key = segment.key();
        let is_risky = segment.is_risky(self.config);
        let target_ts = floor_to_bucket(planned_arrival, self.config.bucket_minutes);

        let raw_slack_min = (deadline - planned_arrival).num_seconds() as f64 / 60.0;
        let slack_min = raw_slack_min.max(0.0);

        // A deadline already behind the planned arrival is certain failure,
        // not a numerically tiny probability.
        if raw_slack_min < 0.0 {
            return Ok(ScoredLeg {
                segment: segment.clone(),
                probability: 0.0,
                explain: LegExplain {
                    segment: key,
                    slack_min,
                    target_ts,
                    is_risky_segment: is_risky,
                    degraded_reason: Some(DegradedReason::DeadlinePassed),
                },
            });
        }

        let Some(segment_id) = self.predictor.segment_id(&key) else {
            return Ok(ScoredLeg {
                segment: segment.clone(),
                probability: self.config.fallback_probability,
                explain: LegExplain {
                    segment: key,
                    slack_min,
                    target_ts,
                    is_risky_segment: is_risky,
                    degraded_reason: Some(DegradedReason::UnknownSegment),
                },
            });
        };

        let real = self
            .history
            .fetch_lookback(&key, target_ts, self.config.lookback_steps as i64)
            .await?;
        let window = HistoryWindow::build(
            &real,
            target_ts,
            self.config.lookback_steps,
            self.config.bucket_minutes,
        );
        if window.padded_steps() > 0 {
            tracing::debug!(
                segment = %key,
                padded = window.padded_steps(),
                "padded sparse delay history"
            );
        }

        let scaler = self.predictor.scaler();
        let input = build_model_input(&window, &scaler);
        let mixture = self.predictor.predict(&input, segment_id).await?;

        let threshold = scaler.normalize(slack_min);
        let probability = mixture_cdf(threshold, &mixture);

        Ok(ScoredLeg {
            segment: segment.clone(),
            probability,
            explain: LegExplain {
                segment: key,
                slack_min,
                target_ts,
                is_risky_segment: is_risky,
                degraded_reason: None,
            },
        })
    }
}
