use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::history::models::DelayBucket;
use railcast_common::error::RailcastResult;

#[async_trait]
pub trait DelayHistoryRepository: Send + Sync {
    /// The most recent delay buckets for `segment` strictly before
    /// `target_ts`, at most `steps` rows, returned ascending by timestamp.
    ///
    /// Returns fewer rows when history is sparse; never errors on sparsity.
    async fn fetch_lookback(
        &self,
        segment: &str,
        target_ts: DateTime<Utc>,
        steps: i64,
    ) -> RailcastResult<Vec<DelayBucket>>;
}
