//! Authentication manager implementation.

use std::sync::Arc;

use super::{
    config::AuthConfig,
    errors::{AuthError, AuthResult},
    models::{AccessTokenClaims, LoginRequest, RegisterRequest, UserRecord, UserRole},
    password,
    token::TokenService,
};
use crate::db::UserStore;
use crate::security::{Clock, LockoutConfig, LockoutDecision, LockoutTracker};

/// Authentication manager
///
/// Orchestrates the login state machine (lockout check → store lookup →
/// password verify → token mint) and the allowlist-gated registration
/// flow. Generic over the credential store through [`UserStore`], so the
/// whole flow runs against the in-memory store in tests.
pub struct AuthManager {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    lockout: LockoutTracker,
    allowlist: Vec<String>,
}

impl AuthManager {
    /// Create a new authentication manager driven by the system clock.
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self::with_clock(users, config, Arc::new(chrono::Utc::now))
    }

    /// Create a manager whose lockout tracker uses an injected clock.
    pub fn with_clock(users: Arc<dyn UserStore>, config: AuthConfig, clock: Clock) -> Self {
        let lockout = LockoutTracker::with_clock(
            LockoutConfig {
                max_attempts: config.max_login_attempts,
                lockout_duration: config.lockout_duration,
            },
            clock,
        );

        Self {
            users,
            tokens: TokenService::new(&config.jwt_secret, config.token_lifetime),
            lockout,
            allowlist: config.allowlist,
        }
    }

    /// Authenticate by email + password and issue an access token.
    ///
    /// An unknown email and a wrong password both count a failure against
    /// the identifier and surface the same `InvalidCredentials`, so the
    /// response never reveals whether an account exists. A successful
    /// login clears the failure counter before minting the token.
    ///
    /// # Errors
    ///
    /// * `AuthError::RateLimited` - Identifier is locked out
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password
    pub async fn login(&self, request: LoginRequest) -> AuthResult<(UserRecord, String)> {
        if let LockoutDecision::Locked { retry_after_minutes } =
            self.lockout.check(&request.identifier).await
        {
            tracing::warn!(identifier = %request.identifier, "login rejected: lockout active");
            return Err(AuthError::RateLimited { retry_after_minutes });
        }

        let Some(user) = self.users.find_by_email(&request.identifier).await? else {
            self.lockout.record_failure(&request.identifier).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify(&request.password, &user.password_hash) {
            self.lockout.record_failure(&request.identifier).await;
            return Err(AuthError::InvalidCredentials);
        }

        self.lockout.clear(&request.identifier).await;

        let token = self.tokens.issue(&user, Some(user.role))?;
        Ok((user, token))
    }

    /// Register a new editorial account and log it in.
    ///
    /// # Errors
    ///
    /// * `AuthError::Forbidden` - Email is not on the allowlist
    /// * `AuthError::DuplicateAccount` - Email already registered
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<(UserRecord, String)> {
        if !self.allowlist.iter().any(|email| email == &request.email) {
            return Err(AuthError::Forbidden);
        }

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::DuplicateAccount);
        }

        let password_hash = password::hash(&request.password)?;
        let user = UserRecord::new(
            request.username,
            request.email,
            password_hash,
            request.full_name,
            UserRole::Editor,
        );
        self.users.insert_user(user.clone()).await?;

        tracing::info!(user_id = %user.id, "registered new editorial account");

        // Register-issued tokens carry no role claim.
        let token = self.tokens.issue(&user, None)?;
        Ok((user, token))
    }

    /// Verify a bearer token and return its claims.
    ///
    /// Stateless: no store lookup, just signature and expiry.
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        self.tokens.verify(token)
    }
}
