pub mod handlers;
pub mod presenter;
pub mod requests;
pub mod responses;
pub mod service;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recommend", post(handlers::recommend))
        .route("/recommend/v2", post(handlers::recommend_v2))
}
