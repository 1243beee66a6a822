use std::cmp::Ordering;

use serde::Serialize;

use crate::route::ScoredRoute;

/// A scored route with its 1-based position in the final ordering.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRoute {
    pub rank: usize,
    #[serde(flatten)]
    pub route: ScoredRoute,
}

/// Order scored routes by probability descending and keep the best `top_k`.
///
/// The sort is stable: routes with equal probability retain the order in
/// which their candidates arrived. Ranks are assigned after sorting.
pub fn rank(mut routes: Vec<ScoredRoute>, top_k: usize) -> Vec<RankedRoute> {
    routes.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });

    routes
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(i, route)| RankedRoute {
            rank: i + 1,
            route,
        })
        .collect()
}
