use chrono::{DateTime, Duration, Utc};

use crate::recommend::requests::RecommendRequest;
use railcast_common::error::RailcastResult;
use railcast_db::candidates::models::CandidateQuery;
use railcast_db::candidates::repositories::CandidateRepository;
use railcast_db::history::repositories::DelayHistoryRepository;
use railcast_scoring::predictor::DelayPredictor;
use railcast_scoring::ranker::{rank, RankedRoute};
use railcast_scoring::route::RouteScorer;
use railcast_scoring::ScoringConfig;

/// Candidate-search bounds that are deployment policy, not per-request
/// input.
#[derive(Debug, Clone)]
pub struct SearchPolicy {
    /// Candidates may arrive this long after the deadline; scoring still
    /// judges them against the deadline itself.
    pub deadline_grace_min: i64,
    pub max_total_hours: i64,
    pub default_min_transfer_min: i64,
}

#[derive(Debug)]
pub struct RecommendOutcome {
    pub now: DateTime<Utc>,
    pub candidate_count: usize,
    pub routes: Vec<RankedRoute>,
}

/// One recommendation pass: collect candidates per shape, score every leg,
/// aggregate, rank.
pub struct RecommendService<'a, C, H, P> {
    candidates: &'a C,
    history: &'a H,
    predictor: &'a P,
    scoring: &'a ScoringConfig,
    policy: &'a SearchPolicy,
}

impl<'a, C, H, P> RecommendService<'a, C, H, P>
where
    C: CandidateRepository,
    H: DelayHistoryRepository,
    P: DelayPredictor,
{
    pub fn new(
        candidates: &'a C,
        history: &'a H,
        predictor: &'a P,
        scoring: &'a ScoringConfig,
        policy: &'a SearchPolicy,
    ) -> Self {
        Self {
            candidates,
            history,
            predictor,
            scoring,
            policy,
        }
    }

    pub async fn recommend(&self, req: &RecommendRequest) -> RailcastResult<RecommendOutcome> {
        let now = req.now.unwrap_or_else(Utc::now);
        let min_transfer_min = req
            .min_transfer_min
            .unwrap_or(self.policy.default_min_transfer_min);

        let query = CandidateQuery {
            from_name: req.from.clone(),
            to_name: req.to.clone(),
            now,
            latest_arrival: req.deadline + Duration::minutes(self.policy.deadline_grace_min),
            min_transfer_min,
            max_total_hours: self.policy.max_total_hours,
            limit: req.limit,
        };

        let mut candidates = self.candidates.find_direct(&query).await?;
        if req.max_transfers >= 1 {
            candidates.extend(self.candidates.find_one_transfer(&query).await?);
        }
        if req.max_transfers >= 2 {
            candidates.extend(self.candidates.find_two_transfer(&query).await?);
        }
        tracing::debug!(count = candidates.len(), "collected route candidates");

        let scorer = RouteScorer::new(self.history, self.predictor, self.scoring);
        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            scored.push(scorer.score(candidate, req.deadline).await?);
        }

        let candidate_count = scored.len();
        let routes = rank(scored, req.top_k);
        Ok(RecommendOutcome {
            now,
            candidate_count,
            routes,
        })
    }
}
