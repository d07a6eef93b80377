use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// Structured API error: every failure carries its taxonomy kind and a
/// message, never a raw error dump.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self { status, kind, message: message.into() }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": {"kind": self.kind, "message": self.message}});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let kind = e.kind();
        match e {
            ServiceError::Unauthenticated(msg) | ServiceError::Unauthorized(msg) => {
                Self::new(StatusCode::UNAUTHORIZED, kind, msg)
            }
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, kind, msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, kind, msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, kind, msg),
            ServiceError::Fatal(msg) => {
                // Detail goes to the log only; the body stays generic
                error!(err = %msg, "fatal service error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, kind, "internal server error")
            }
        }
    }
}
