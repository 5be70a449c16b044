//! Authentication module providing user registration, login, and token
//! validation.
//!
//! This module implements the editorial authentication flow:
//! - Argon2id password hashing with per-hash random salts
//! - JWT access tokens (24-hour expiry, HS256)
//! - Per-identifier brute-force lockout (5 attempts, 15-minute window)
//! - An allowlist gate on self-registration
//!
//! Tokens are self-contained: validity is a function of signature and the
//! embedded expiry alone, so a token stays valid for its full lifetime
//! even if the underlying account changes afterwards. That staleness
//! window is accepted; revocation would be a denylist bolted on later,
//! not a session store.
//!
//! ## Example
//!
//! ```
//! use corner_cms::auth::{AuthConfig, AuthManager, LoginRequest};
//! use corner_cms::db::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let auth = AuthManager::new(Arc::new(MemoryStore::new()), AuthConfig::default());
//!
//!     let request = LoginRequest {
//!         identifier: "editor@example.com".to_string(),
//!         password: "hunter2hunter2".to_string(),
//!     };
//!
//!     // No such account: indistinguishable from a wrong password.
//!     assert!(auth.login(request).await.is_err());
//! }
//! ```

pub mod config;
pub mod errors;
pub mod manager;
pub mod models;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{AccessTokenClaims, LoginRequest, RegisterRequest, UserRecord, UserRole};
pub use token::TokenService;
