mod error;
mod model;
mod recommend;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use model::artifacts::Artifacts;
use model::client::{ModelClient, ModelClientConfig};
use model::SidecarPredictor;
use railcast_common::error::{RailcastError, RailcastResult};
use railcast_common::types::ServiceInfo;
use railcast_config::{init_tracing, AppConfig};
use railcast_db::candidates::pg_repository::PgCandidateRepository;
use railcast_db::history::pg_repository::PgDelayHistoryRepository;
use railcast_scoring::config::AggregationPolicy;
use railcast_scoring::ScoringConfig;
use recommend::service::SearchPolicy;

#[derive(Clone)]
pub struct AppState {
    pub history_repo: PgDelayHistoryRepository,
    pub candidate_repo: PgCandidateRepository,
    pub predictor: Arc<SidecarPredictor>,
    pub scoring: Arc<ScoringConfig>,
    pub search: Arc<SearchPolicy>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("railcast-api"))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP railcast_up Service up indicator\n\
# TYPE railcast_up gauge\n\
railcast_up 1\n\
# HELP railcast_info Service info\n\
# TYPE railcast_info gauge\n\
railcast_info{service=\"railcast-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn scoring_config(cfg: &AppConfig) -> RailcastResult<ScoringConfig> {
    let aggregation = AggregationPolicy::parse(&cfg.route_agg)
        .ok_or_else(|| RailcastError::Config(format!("invalid ROUTE_AGG: {}", cfg.route_agg)))?;

    Ok(ScoringConfig {
        lookback_steps: cfg.lookback_steps,
        bucket_minutes: cfg.bucket_minutes,
        aggregation,
        risky_stations: cfg.risky_station_codes.iter().cloned().collect(),
        ..ScoringConfig::default()
    })
}

fn search_policy(cfg: &AppConfig) -> SearchPolicy {
    SearchPolicy {
        deadline_grace_min: cfg.deadline_grace_min,
        max_total_hours: cfg.max_total_hours,
        default_min_transfer_min: cfg.default_min_transfer_min,
    }
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(recommend::router())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = AppConfig::from_env().expect("failed to load config");
    tracing::info!(service = "railcast-api", "starting");

    let scoring = scoring_config(&config).expect("invalid scoring configuration");
    let search = search_policy(&config);

    let pool = railcast_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let artifacts =
        Artifacts::load(Path::new(&config.artifacts_dir)).expect("failed to load model artifacts");
    tracing::info!(
        segments = artifacts.segment_to_id.len(),
        "loaded model artifacts"
    );
    let client = ModelClient::new(ModelClientConfig::new(&config.model_base_url))
        .expect("failed to build model client");

    let state = AppState {
        history_repo: PgDelayHistoryRepository::new(pool.clone()),
        candidate_repo: PgCandidateRepository::new(pool),
        predictor: Arc::new(SidecarPredictor::new(artifacts, client)),
        scoring: Arc::new(scoring),
        search: Arc::new(search),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
