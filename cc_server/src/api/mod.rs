//! HTTP API for the CMS backend.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower-http**: CORS middleware
//! - **JWT**: Stateless bearer-token authentication
//!
//! # Modules
//!
//! - [`auth`]: Registration, login, and token validation
//! - [`articles`]: Article listing, fetching, and creation
//! - [`categories`]: Category listing and creation
//! - [`uploads`]: Image upload handling
//! - [`middleware`]: Authentication middleware for protected endpoints
//! - [`request_id`]: Request correlation IDs
//!
//! # Endpoints Overview
//!
//! ## Public
//! - `GET  /health` - Server health status
//! - `GET  /api/` - API info
//! - `POST /api/auth/register` - Register (allowlisted emails only)
//! - `POST /api/auth/local` - Login with email + password
//! - `GET  /api/categories` - List categories
//! - `GET  /api/articles` - List articles (filters, sort, pagination)
//! - `GET  /api/articles/{id}` - Fetch one article (increments views)
//!
//! ## Protected (bearer token required)
//! - `GET  /api/auth/validate` - Check a token
//! - `POST /api/categories` - Create category
//! - `POST /api/articles` - Create article (author stamped from token)
//! - `POST /api/upload` - Upload an image
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod middleware;
pub mod request_id;
pub mod uploads;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use corner_cms::auth::AuthManager;
use corner_cms::db::{ContentStore, Database, UserStore};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap, everything is behind an Arc).
#[derive(Clone)]
pub struct AppState {
    /// Authentication manager (lockout, credentials, tokens)
    pub auth: Arc<AuthManager>,
    /// Credential store (author population on article reads)
    pub users: Arc<dyn UserStore>,
    /// Article and category store
    pub content: Arc<dyn ContentStore>,
    /// Database handle for health checks; `None` in memory-store mode
    pub database: Option<Arc<Database>>,
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes
    pub upload_max_bytes: usize,
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a store failure onto a sanitized 500.
pub(crate) fn store_error(
    err: corner_cms::db::StoreError,
) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!(error = %err, "content store failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    // Multipart bodies are a little larger than the file they carry.
    let upload_body_limit = state.upload_max_bytes + 64 * 1024;

    let public_routes = Router::new()
        .route("/", get(api_root))
        .route("/auth/register", post(auth::register))
        .route("/auth/local", post(auth::login))
        .route("/categories", get(categories::list_categories))
        .route("/articles", get(articles::list_articles))
        .route("/articles/{id}", get(articles::get_article));

    let protected_routes = Router::new()
        .route("/auth/validate", get(auth::validate_token))
        .route("/categories", post(categories::create_category))
        .route("/articles", post(articles::create_article))
        .route(
            "/upload",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API info endpoint (`GET /api/`).
async fn api_root() -> impl IntoResponse {
    Json(json!({
        "message": "Corner CMS API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the backing store answers, `503` otherwise. In
/// memory-store mode there is nothing external to probe.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match &state.database {
        Some(database) => database.health_check().await.is_ok(),
        None => true,
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
