//! Authentication API handlers.
//!
//! - `POST /api/auth/register` — allowlist-gated registration, returns a
//!   fresh token alongside the public user fields
//! - `POST /api/auth/local` — email + password login
//! - `GET /api/auth/validate` — bearer-token check for the admin UI
//!
//! # Examples
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:8001/api/auth/local \
//!   -H "Content-Type: application/json" \
//!   -d '{"identifier": "editor@example.com", "password": "hunter2"}'
//! ```

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use corner_cms::auth::{AuthError, LoginRequest, RegisterRequest};
use serde_json::json;

use super::{AppState, ErrorResponse};
use crate::{logging, metrics};

/// Map an auth error onto its HTTP status and client-safe body.
fn error_response(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        AuthError::InvalidToken | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        AuthError::DuplicateAccount => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Register a new editorial account and log it in.
///
/// # Response
///
/// `201 Created` with a token and the public user fields:
/// ```json
/// {
///   "jwt": "eyJhbGciOiJIUzI1NiIs...",
///   "user": { "id": "…", "username": "editor", "email": "editor@example.com" }
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: email not on the registration allowlist
/// - `400 Bad Request`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    match state.auth.register(payload).await {
        Ok((user, token)) => {
            metrics::registrations_total();
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "jwt": token,
                    "user": {
                        "id": user.id,
                        "username": user.username,
                        "email": user.email,
                    },
                })),
            ))
        }
        Err(e) => {
            logging::log_security_event("register_rejected", None, &e.client_message());
            Err(error_response(e))
        }
    }
}

/// Authenticate with email + password.
///
/// # Response
///
/// `200 OK` with a token and the public user fields (including role):
/// ```json
/// {
///   "jwt": "eyJhbGciOiJIUzI1NiIs...",
///   "user": { "id": "…", "username": "editor", "email": "…", "role": "editor" }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (indistinguishable)
/// - `429 Too Many Requests`: lockout active, body carries minutes remaining
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let identifier = payload.identifier.clone();

    match state.auth.login(payload).await {
        Ok((user, token)) => {
            metrics::login_attempts_total(true);
            Ok(Json(json!({
                "jwt": token,
                "user": {
                    "id": user.id,
                    "username": user.username,
                    "email": user.email,
                    "role": user.role,
                },
            })))
        }
        Err(e) => {
            match &e {
                AuthError::RateLimited { .. } => {
                    metrics::lockout_hits_total();
                    logging::log_security_event(
                        "login_locked_out",
                        Some(&identifier),
                        "Login rejected by lockout",
                    );
                }
                AuthError::InvalidCredentials => {
                    metrics::login_attempts_total(false);
                    logging::log_security_event(
                        "failed_login",
                        Some(&identifier),
                        "Invalid credentials",
                    );
                }
                _ => {}
            }
            Err(error_response(e))
        }
    }
}

/// Confirm a bearer token is valid (`GET /api/auth/validate`).
///
/// The auth middleware has already verified the token by the time this
/// handler runs, so it only has to acknowledge.
pub async fn validate_token() -> impl IntoResponse {
    Json(json!({ "valid": true }))
}
