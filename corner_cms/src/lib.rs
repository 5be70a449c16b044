//! # Corner CMS
//!
//! Backend library for a small editorial content-management system.
//!
//! The library is split into four concerns:
//!
//! - [`auth`]: credential verification, Argon2id password hashing, JWT
//!   issuance/verification, and the registration allowlist gate
//! - [`security`]: in-memory brute-force lockout tracking for login
//!   identifiers
//! - [`content`]: article and category models served by the JSON API
//! - [`db`]: connection pooling plus the `UserStore`/`ContentStore`
//!   traits with PostgreSQL and in-memory implementations
//!
//! The HTTP surface lives in the companion `cc_server` crate; this crate
//! holds everything that can be exercised without a socket.
//!
//! ## Example
//!
//! ```
//! use corner_cms::auth::{AuthConfig, AuthManager, RegisterRequest};
//! use corner_cms::db::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let config = AuthConfig {
//!         allowlist: vec!["editor@example.com".to_string()],
//!         ..AuthConfig::default()
//!     };
//!     let auth = AuthManager::new(store, config);
//!
//!     let request = RegisterRequest {
//!         username: "editor".to_string(),
//!         email: "editor@example.com".to_string(),
//!         password: "hunter2hunter2".to_string(),
//!         full_name: None,
//!     };
//!
//!     let (user, _token) = auth.register(request).await?;
//!     println!("Registered user: {}", user.username);
//!     Ok(())
//! }
//! ```

/// Authentication: credentials, tokens, and the registration gate.
pub mod auth;
pub use auth::{AuthConfig, AuthError, AuthManager, AuthResult};

/// Article and category models.
pub mod content;
pub use content::{Article, ArticleQuery, ArticleSort, Category};

/// Database pool and store traits/implementations.
pub mod db;
pub use db::{ContentStore, Database, DatabaseConfig, MemoryStore, UserStore};

/// Brute-force lockout tracking.
pub mod security;
pub use security::{LockoutConfig, LockoutDecision, LockoutTracker};
