//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use chrono::Duration;
use corner_cms::auth::AuthConfig;
use corner_cms::db::DatabaseConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default operator account allowed to self-register.
const DEFAULT_ALLOWLIST: &str = "admin@example.com";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration (`None` runs on the in-memory store)
    pub database: Option<DatabaseConfig>,
    /// Security configuration
    pub security: SecurityConfig,
    /// Upload handling configuration
    pub uploads: UploadConfig,
    /// Optional Prometheus scrape endpoint bind address
    pub metrics_bind: Option<SocketAddr>,
}

/// Security-related configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in hours
    pub token_lifetime_hours: i64,
    /// Failed logins tolerated before lockout
    pub max_login_attempts: u32,
    /// Lockout duration in minutes
    pub lockout_duration_minutes: i64,
    /// Emails permitted to self-register
    pub registration_allowlist: Vec<String>,
}

/// Upload handling configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded images are written to
    pub dir: PathBuf,
    /// Maximum accepted file size in bytes
    pub max_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if any variable is present but invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:8001"
                    .parse()
                    .expect("Default bind address is valid")
            });

        // Database is optional: without a URL the server runs on the
        // in-memory store (useful for local front-end work).
        let database_url = database_url_override.or_else(|| std::env::var("DATABASE_URL").ok());
        let database = database_url.map(|database_url| DatabaseConfig {
            database_url,
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", 5),
            connection_timeout_secs: parse_env_or("DB_CONNECTION_TIMEOUT", 10),
            idle_timeout_secs: parse_env_or("DB_IDLE_TIMEOUT", 600),
            max_lifetime_secs: parse_env_or("DB_MAX_LIFETIME", 1800),
        });

        let registration_allowlist: Vec<String> = std::env::var("REGISTRATION_ALLOWLIST")
            .unwrap_or_else(|_| DEFAULT_ALLOWLIST.to_string())
            .split(',')
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .collect();

        let security = SecurityConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "default_cms_jwt_secret_change_in_production".to_string()),
            token_lifetime_hours: parse_env_or("TOKEN_LIFETIME_HOURS", 24),
            max_login_attempts: parse_env_or("MAX_LOGIN_ATTEMPTS", 5),
            lockout_duration_minutes: parse_env_or("LOCKOUT_DURATION_MINUTES", 15),
            registration_allowlist,
        };

        let uploads = UploadConfig {
            dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_bytes: parse_env_or("UPLOAD_MAX_BYTES", 5 * 1024 * 1024),
        };

        let metrics_bind: Option<SocketAddr> = std::env::var("METRICS_BIND")
            .ok()
            .map(|s| {
                s.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
                    var: "METRICS_BIND".to_string(),
                    reason: "Must be an IP:PORT socket address".to_string(),
                })
            })
            .transpose()?;

        Ok(ServerConfig {
            bind,
            database,
            security,
            uploads,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.security.token_lifetime_hours < 1 {
            return Err(ConfigError::Invalid {
                var: "TOKEN_LIFETIME_HOURS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.security.max_login_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_LOGIN_ATTEMPTS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.security.lockout_duration_minutes < 1 {
            return Err(ConfigError::Invalid {
                var: "LOCKOUT_DURATION_MINUTES".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.security.registration_allowlist.is_empty() {
            return Err(ConfigError::Invalid {
                var: "REGISTRATION_ALLOWLIST".to_string(),
                reason: "Must contain at least one email".to_string(),
            });
        }

        for email in &self.security.registration_allowlist {
            if !email.contains('@') {
                return Err(ConfigError::Invalid {
                    var: "REGISTRATION_ALLOWLIST".to_string(),
                    reason: format!("'{email}' is not an email address"),
                });
            }
        }

        if self.uploads.max_bytes == 0 {
            return Err(ConfigError::Invalid {
                var: "UPLOAD_MAX_BYTES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl SecurityConfig {
    /// Build the library-level auth configuration.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_lifetime: Duration::hours(self.token_lifetime_hours),
            max_login_attempts: self.max_login_attempts,
            lockout_duration: Duration::minutes(self.lockout_duration_minutes),
            allowlist: self.registration_allowlist.clone(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8001".parse().unwrap(),
            database: None,
            security: SecurityConfig {
                jwt_secret: "a".repeat(32),
                token_lifetime_hours: 24,
                max_login_attempts: 5,
                lockout_duration_minutes: 15,
                registration_allowlist: vec!["admin@example.com".to_string()],
            },
            uploads: UploadConfig {
                dir: PathBuf::from("uploads"),
                max_bytes: 5 * 1024 * 1024,
            },
            metrics_bind: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        base_config().validate().unwrap();
    }

    #[test]
    fn empty_allowlist_is_rejected() {
        let mut config = base_config();
        config.security.registration_allowlist.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("REGISTRATION_ALLOWLIST"));
    }

    #[test]
    fn non_email_allowlist_entry_is_rejected() {
        let mut config = base_config();
        config.security.registration_allowlist = vec!["not-an-email".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not-an-email"));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let mut config = base_config();
        config.security.max_login_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn auth_config_carries_the_policy() {
        let config = base_config();
        let auth = config.security.auth_config();
        assert_eq!(auth.max_login_attempts, 5);
        assert_eq!(auth.lockout_duration, Duration::minutes(15));
        assert_eq!(auth.token_lifetime, Duration::hours(24));
    }
}
