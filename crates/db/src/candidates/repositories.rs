use async_trait::async_trait;

use crate::candidates::models::{CandidateQuery, RouteCandidate};
use railcast_common::error::RailcastResult;

#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Direct (0-transfer) journeys within the query bounds.
    async fn find_direct(&self, query: &CandidateQuery) -> RailcastResult<Vec<RouteCandidate>>;

    /// One-transfer (2-leg) journeys within the query bounds.
    async fn find_one_transfer(
        &self,
        query: &CandidateQuery,
    ) -> RailcastResult<Vec<RouteCandidate>>;

    /// Two-transfer (3-leg) journeys within the query bounds.
    async fn find_two_transfer(
        &self,
        query: &CandidateQuery,
    ) -> RailcastResult<Vec<RouteCandidate>>;
}
