//! Bearer-token authentication for the proxy's own HTTP API: looks the
//! token up in the account store rather than decoding a self-contained
//! token, since tokens here are opaque handles minted by
//! [`crate::account::AccountService::login`].

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::AppState;

/// The authenticated student id, inserted into request extensions by
/// [`auth_middleware`] for handlers to pull out via `Extension`.
#[derive(Debug, Clone)]
pub struct AuthenticatedStudent {
    pub student_id: String,
}

/// Validates the request's bearer token and attaches the resolved student
/// id to the request before passing it on. Accepts either a standard
/// `Authorization: Bearer <token>` header or a bare `token` header, since
/// the iCalendar subscription endpoints are fetched by calendar clients
/// that cannot set an `Authorization` header.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(&req).ok_or(AuthError::MissingToken)?;

    let account = state
        .account_service
        .get_by_token(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    if !account.is_active() {
        return Err(AuthError::InvalidToken);
    }

    req.extensions_mut().insert(AuthenticatedStudent {
        student_id: account.id,
    });

    Ok(next.run(req).await)
}

fn extract_token(req: &Request) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    req.headers()
        .get("token")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}

/// Authentication errors surfaced to the client as 401 responses.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "missing authentication token",
            Self::InvalidToken => "invalid or expired token",
        };

        (StatusCode::UNAUTHORIZED, axum::Json(json!({ "error": message }))).into_response()
    }
}
