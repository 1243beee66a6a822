use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::features::ModelInput;
use crate::probability::Mixture;
use railcast_common::error::RailcastResult;

/// Global delay normalization fitted at training time (`scaler.json`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormScaler {
    pub mean: f64,
    pub std: f64,
}

impl NormScaler {
    pub fn normalize(&self, x: f64) -> f64 {
        (x - self.mean) / self.std.max(1e-8)
    }
}

/// Black-box next-step delay forecaster.
///
/// Implementations must be deterministic for identical input and loaded
/// model state, and safe for concurrent read-only use across requests.
#[async_trait]
pub trait DelayPredictor: Send + Sync {
    /// Vocabulary id for a segment key, `None` when the model never saw it.
    fn segment_id(&self, segment: &str) -> Option<i64>;

    /// The normalization the model's inputs and outputs live in.
    fn scaler(&self) -> NormScaler;

    /// Mixture-of-Gaussians over the next step's normalized delay.
    async fn predict(&self, input: &ModelInput, segment_id: i64) -> RailcastResult<Mixture>;
}
