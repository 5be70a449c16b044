//! Authentication configuration.

use chrono::Duration;

/// Configuration for the authentication manager.
///
/// All values have working local defaults; deployments override them
/// through the server's environment surface.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for HS256 token signing. Read-only after startup.
    pub jwt_secret: String,
    /// Access token lifetime (default: 24 hours).
    pub token_lifetime: Duration,
    /// Max consecutive failed login attempts before lockout (default: 5).
    pub max_login_attempts: u32,
    /// Lockout duration after exceeding the limit (default: 15 minutes).
    pub lockout_duration: Duration,
    /// Emails permitted to self-register.
    pub allowlist: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "default_cms_jwt_secret_change_in_production".to_string(),
            token_lifetime: Duration::hours(24),
            max_login_attempts: 5,
            lockout_duration: Duration::minutes(15),
            allowlist: vec!["admin@example.com".to_string()],
        }
    }
}
