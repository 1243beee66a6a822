pub mod artifacts;
pub mod client;

use async_trait::async_trait;

use artifacts::Artifacts;
use client::ModelClient;
use railcast_common::error::RailcastResult;
use railcast_scoring::features::ModelInput;
use railcast_scoring::predictor::{DelayPredictor, NormScaler};
use railcast_scoring::probability::Mixture;

/// Production forecaster: segment vocabulary and scaler come from the
/// training artifacts on disk, mixtures from the model sidecar over HTTP.
pub struct SidecarPredictor {
    artifacts: Artifacts,
    client: ModelClient,
}

impl SidecarPredictor {
    pub fn new(artifacts: Artifacts, client: ModelClient) -> Self {
        Self { artifacts, client }
    }
}

#[async_trait]
impl DelayPredictor for SidecarPredictor {
    fn segment_id(&self, segment: &str) -> Option<i64> {
        self.artifacts.segment_id(segment)
    }

    fn scaler(&self) -> NormScaler {
        self.artifacts.scaler
    }

    async fn predict(&self, input: &ModelInput, segment_id: i64) -> RailcastResult<Mixture> {
        self.client.predict(input, segment_id).await
    }
}
