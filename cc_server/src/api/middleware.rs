//! Authentication middleware for protected endpoints.
//!
//! Extracts and validates the JWT bearer token from the Authorization
//! header, then injects the decoded claims into request extensions so
//! handlers can read the authenticated identity (e.g. to stamp
//! `author_id` on created content).
//!
//! # Extracting claims
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use corner_cms::auth::AccessTokenClaims;
//!
//! async fn protected_handler(Extension(claims): Extension<AccessTokenClaims>) -> String {
//!     format!("Authenticated as {}", claims.email)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use super::{AppState, ErrorResponse};

/// Validate the bearer token and inject the decoded claims.
///
/// # Behavior
///
/// - **Success**: claims inserted into request extensions, handler runs
/// - **Missing/malformed header**: `401 Unauthorized`, handler never runs
/// - **Invalid or expired token**: `401 Unauthorized` with the error kind's
///   message, handler never runs
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = auth_header else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Missing bearer token".to_string(),
            }),
        ));
    };

    match state.auth.verify_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: e.client_message(),
            }),
        )),
    }
}
