use serde::{Deserialize, Serialize};
use statrs::function::erf::erf;

/// Floor applied to mixture standard deviations before dividing. The
/// forecaster boundary enforces the same floor; it is re-applied at
/// consumption time.
pub const SIGMA_FLOOR: f64 = 1e-6;

/// Finite mixture of Gaussians over normalized delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mixture {
    pub weights: Vec<f64>,
    pub means: Vec<f64>,
    pub stddevs: Vec<f64>,
}

impl Mixture {
    pub fn components(&self) -> usize {
        self.weights.len()
    }
}

fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// P(X <= threshold) under the mixture, clamped to [0, 1].
pub fn mixture_cdf(threshold: f64, mixture: &Mixture) -> f64 {
    let mut acc = 0.0;
    for ((weight, mean), stddev) in mixture
        .weights
        .iter()
        .zip(&mixture.means)
        .zip(&mixture.stddevs)
    {
        let z = (threshold - mean) / stddev.max(SIGMA_FLOOR);
        acc += weight * normal_cdf(z);
    }
    clamp01(acc)
}

pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
