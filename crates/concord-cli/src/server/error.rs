//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use concord::ConcordError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Error from concord library.
    Concord(ConcordError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Concord(e) => match e {
                ConcordError::InsufficientSources { .. } => {
                    (StatusCode::BAD_REQUEST, "insufficient_sources")
                }
                ConcordError::TooManySources { .. } => (StatusCode::BAD_REQUEST, "too_many_sources"),
                ConcordError::UnknownFeature(_) => (StatusCode::NOT_FOUND, "unknown_feature"),
                ConcordError::NoRun => (StatusCode::CONFLICT, "no_run"),
                ConcordError::Superseded { .. } => (StatusCode::CONFLICT, "superseded"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Concord(e) => e.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<ConcordError> for ApiError {
    fn from(err: ConcordError) -> Self {
        ApiError::Concord(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Concord(e) => write!(f, "Concord error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
