use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How per-leg on-time probabilities combine into one route probability.
///
/// `Min` treats the route as a weakest-link chain: one late leg breaks the
/// deadline. `Product` multiplies legs as independent events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    Min,
    Product,
}

impl AggregationPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "min" => Some(Self::Min),
            "product" => Some(Self::Product),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Product => "product",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// History window length fed to the forecaster, in buckets.
    pub lookback_steps: usize,
    /// Width of one delay bucket.
    pub bucket_minutes: i64,
    pub aggregation: AggregationPolicy,
    /// Stations historically prone to delay propagation; a leg touching one
    /// is flagged in its explain record.
    pub risky_stations: HashSet<String>,
    /// Probability assigned when the forecaster has no vocabulary entry for
    /// a segment.
    pub fallback_probability: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lookback_steps: 12,
            bucket_minutes: 10,
            aggregation: AggregationPolicy::Min,
            risky_stations: ["NAT013271", "NAT040257"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            fallback_probability: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let cfg = ScoringConfig::default();
        assert!(cfg.lookback_steps > 0);
        assert!(cfg.bucket_minutes > 0);
        assert_eq!(cfg.aggregation, AggregationPolicy::Min);
        assert!((0.0..=1.0).contains(&cfg.fallback_probability));
        assert_eq!(cfg.risky_stations.len(), 2);
    }

    #[test]
    fn policy_parse_round_trips() {
        assert_eq!(AggregationPolicy::parse("min"), Some(AggregationPolicy::Min));
        assert_eq!(
            AggregationPolicy::parse("product"),
            Some(AggregationPolicy::Product)
        );
        assert_eq!(AggregationPolicy::parse("avg"), None);
        assert_eq!(AggregationPolicy::Min.as_str(), "min");
        assert_eq!(AggregationPolicy::Product.as_str(), "product");
    }
}
