use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use railcast_common::error::{RailcastError, RailcastResult};
use railcast_scoring::features::{ModelInput, NUM_FEATURES};
use railcast_scoring::probability::Mixture;

#[derive(Debug, Clone)]
pub struct ModelClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ModelClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout_secs: 10,
        }
    }
}

/// HTTP client for the delay-forecast sidecar.
#[derive(Clone)]
pub struct ModelClient {
    client: Client,
    config: ModelClientConfig,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    segment_id: i64,
    features: &'a [[f32; NUM_FEATURES]],
}

#[derive(Deserialize)]
struct PredictResponse {
    weights: Vec<f64>,
    means: Vec<f64>,
    stddevs: Vec<f64>,
}

impl ModelClient {
    pub fn new(config: ModelClientConfig) -> RailcastResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RailcastError::Model(format!("cannot build client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Request the mixture for one window. The sidecar is deterministic for
    /// identical input and loaded model state.
    pub async fn predict(&self, input: &ModelInput, segment_id: i64) -> RailcastResult<Mixture> {
        let url = format!("{}/predict", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest {
                segment_id,
                features: &input.rows,
            })
            .send()
            .await
            .map_err(|e| RailcastError::Model(format!("predict request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RailcastError::Model(format!(
                "sidecar returned {status}: {body}"
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| RailcastError::Model(format!("invalid predict response: {e}")))?;

        if parsed.weights.is_empty()
            || parsed.weights.len() != parsed.means.len()
            || parsed.weights.len() != parsed.stddevs.len()
        {
            return Err(RailcastError::Model(format!(
                "mixture arity mismatch: {} weights, {} means, {} stddevs",
                parsed.weights.len(),
                parsed.means.len(),
                parsed.stddevs.len()
            )));
        }

        Ok(Mixture {
            weights: parsed.weights,
            means: parsed.means,
            stddevs: parsed.stddevs,
        })
    }
}
