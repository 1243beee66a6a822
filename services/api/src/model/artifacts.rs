use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use railcast_common::error::{RailcastError, RailcastResult};
use railcast_scoring::predictor::NormScaler;

/// Training artifacts exported next to the model: the segment vocabulary
/// (`segment_map.json`) and the global delay scaler (`scaler.json`).
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub segment_to_id: HashMap<String, i64>,
    pub scaler: NormScaler,
}

#[derive(Debug, Deserialize)]
struct ScalerFile {
    mean: f64,
    std: f64,
}

impl Artifacts {
    pub fn load(dir: &Path) -> RailcastResult<Self> {
        let segment_to_id: HashMap<String, i64> = read_json(&dir.join("segment_map.json"))?;
        let scaler: ScalerFile = read_json(&dir.join("scaler.json"))?;

        if segment_to_id.is_empty() {
            return Err(RailcastError::Config(
                "segment_map.json contains no segments".to_owned(),
            ));
        }

        Ok(Self {
            segment_to_id,
            scaler: NormScaler {
                mean: scaler.mean,
                std: scaler.std,
            },
        })
    }

    pub fn segment_id(&self, segment: &str) -> Option<i64> {
        self.segment_to_id.get(segment).copied()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> RailcastResult<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| RailcastError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| RailcastError::Config(format!("cannot parse {}: {e}", path.display())))
}
