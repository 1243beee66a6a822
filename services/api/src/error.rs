use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use railcast_common::error::RailcastError;

pub struct ApiError(pub RailcastError);

impl From<RailcastError> for ApiError {
    fn from(err: RailcastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RailcastError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            RailcastError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
