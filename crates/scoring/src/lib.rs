pub mod config;
pub mod features;
pub mod leg;
pub mod predictor;
pub mod probability;
pub mod ranker;
pub mod route;
pub mod segment;
pub mod window;

pub use config::{AggregationPolicy, ScoringConfig};
pub use leg::{LegScorer, ScoredLeg};
pub use predictor::{DelayPredictor, NormScaler};
pub use probability::Mixture;
pub use ranker::{rank, RankedRoute};
pub use route::{aggregate, RouteScorer, ScoredRoute};
pub use segment::Segment;
