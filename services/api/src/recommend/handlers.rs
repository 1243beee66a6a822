use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::recommend::presenter::present;
use crate::recommend::requests::RecommendRequest;
use crate::recommend::responses::{QueryEcho, RawRecommendResponse, RecommendResponseV2};
use crate::recommend::service::{RecommendOutcome, RecommendService};
use crate::AppState;

async fn run_service(
    state: &AppState,
    req: &RecommendRequest,
) -> Result<RecommendOutcome, ApiError> {
    let service = RecommendService::new(
        &state.candidate_repo,
        &state.history_repo,
        state.predictor.as_ref(),
        &state.scoring,
        &state.search,
    );
    Ok(service.recommend(req).await?)
}

pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RawRecommendResponse>, ApiError> {
    req.validate()?;
    let outcome = run_service(&state, &req).await?;

    Ok(Json(RawRecommendResponse {
        from: req.from,
        to: req.to,
        now: outcome.now,
        deadline: req.deadline,
        route_agg: state.scoring.aggregation.as_str().to_owned(),
        candidate_count: outcome.candidate_count,
        results: outcome.routes,
    }))
}

pub async fn recommend_v2(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponseV2>, ApiError> {
    req.validate()?;
    let outcome = run_service(&state, &req).await?;

    let query = QueryEcho {
        from: req.from,
        to: req.to,
        now: outcome.now,
        deadline: req.deadline,
        max_transfers: req.max_transfers,
        min_transfer_min: req
            .min_transfer_min
            .unwrap_or(state.search.default_min_transfer_min),
    };

    Ok(Json(present(
        &outcome.routes,
        &query,
        state.scoring.aggregation,
        &state.scoring.risky_stations,
        outcome.candidate_count,
    )))
}
