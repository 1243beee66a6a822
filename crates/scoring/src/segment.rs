use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;

/// Directed station pair for one travel leg, keyed as `DEP->ARR` in the
/// delay-bucket table and the forecaster vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub dep: String,
    pub arr: String,
}

impl Segment {
    pub fn new(dep: &str, arr: &str) -> Self {
        Self {
            dep: dep.to_owned(),
            arr: arr.to_owned(),
        }
    }

    pub fn key(&self) -> String {
        format!("{}->{}", self.dep, self.arr)
    }

    pub fn is_risky(&self, config: &ScoringConfig) -> bool {
        config.risky_stations.contains(&self.dep) || config.risky_stations.contains(&self.arr)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.dep, self.arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_station_codes() {
        let seg = Segment::new("NAT010000", "NAT013271");
        assert_eq!(seg.key(), "NAT010000->NAT013271");
        assert_eq!(seg.to_string(), seg.key());
    }

    #[test]
    fn risky_when_either_endpoint_is_risky() {
        let cfg = ScoringConfig::default();
        assert!(Segment::new("NAT013271", "NAT010000").is_risky(&cfg));
        assert!(Segment::new("NAT010000", "NAT040257").is_risky(&cfg));
        assert!(!Segment::new("NAT010000", "NAT010032").is_risky(&cfg));
    }
}
