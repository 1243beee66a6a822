use chrono::{DateTime, Utc};
use serde::Deserialize;

use railcast_common::error::{RailcastError, RailcastResult};

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    pub from: String,
    pub to: String,
    pub deadline: DateTime<Utc>,
    pub now: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    pub min_transfer_min: Option<i64>,
    #[serde(default = "default_max_transfers")]
    pub max_transfers: u8,
}

fn default_limit() -> i64 {
    200
}

fn default_top_k() -> usize {
    10
}

fn default_max_transfers() -> u8 {
    2
}

impl RecommendRequest {
    pub fn validate(&self) -> RailcastResult<()> {
        if self.from.trim().is_empty() {
            return Err(RailcastError::Validation("from must not be empty".to_owned()));
        }
        if self.to.trim().is_empty() {
            return Err(RailcastError::Validation("to must not be empty".to_owned()));
        }
        if self.max_transfers > 2 {
            return Err(RailcastError::Validation(
                "max_transfers must be 0, 1 or 2".to_owned(),
            ));
        }
        if self.limit <= 0 {
            return Err(RailcastError::Validation("limit must be positive".to_owned()));
        }
        if self.top_k == 0 {
            return Err(RailcastError::Validation("top_k must be positive".to_owned()));
        }
        if let Some(m) = self.min_transfer_min {
            if m < 0 {
                return Err(RailcastError::Validation(
                    "min_transfer_min must not be negative".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
