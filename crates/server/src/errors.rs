use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// Store failures surface as a server error body instead of a fake success.
#[derive(Debug)]
pub struct ApiError(pub String);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let msg = self.0;
        error!(error = %msg, "state request failed");
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
