//! Crate-wide error taxonomy: a tagged enum so retry/relogin logic in
//! [`crate::upstream::student`] can dispatch on the error kind instead of
//! comparing message text.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("token has been occupied by another account")]
    TokenCollision,

    #[error("service unavailable")]
    ServiceUnavailable,

    #[error("{0}")]
    Logical(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unknown error: status={0}")]
    Unknown(u16),
}

impl AppError {
    /// True for the error kinds the student getter loop treats as retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Error surfaced to clients of the proxy's own HTTP API.
///
/// Distinct from [`AppError`]: this is the outer, client-facing shape.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    MethodNotAllowed,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound | AppError::Unauthorized => Self::Unauthorized,
            AppError::TokenCollision => Self::BadRequest(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}
