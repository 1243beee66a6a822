use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fixed-width time bucket of averaged arrival delay for a segment.
///
/// Rows are written by the ingestion pipeline; this crate only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayBucket {
    pub segment: String,
    pub ts: DateTime<Utc>,
    pub mean_delay_min: f64,
}
