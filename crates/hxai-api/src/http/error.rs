//! Application error type mapping to HTTP status codes.
//!
//! Every error body is `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use hxai_types::error::GenerationError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the generation pipeline and document store.
    Generation(GenerationError),
    /// Unknown resource (session, download file).
    NotFound(String),
    /// Malformed request input.
    Validation(String),
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Generation(e) => match e {
                GenerationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                GenerationError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
                GenerationError::TargetNotFound(_) => StatusCode::NOT_FOUND,
                GenerationError::AmbiguousTarget { .. } => StatusCode::CONFLICT,
                GenerationError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                GenerationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Generation(GenerationError::InvalidArgument(msg)) => msg.clone(),
            AppError::Generation(e) => e.to_string(),
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
