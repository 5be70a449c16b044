//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or wrong password — deliberately indistinguishable so
    /// the response never reveals whether an account exists.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Lockout active for this identifier.
    #[error("Too many login attempts. Try again in {retry_after_minutes} minutes")]
    RateLimited { retry_after_minutes: i64 },

    /// Token malformed, unsigned, or tampered.
    #[error("Invalid token. Please log in again")]
    InvalidToken,

    /// Token expired.
    #[error("Token has expired. Please log in again")]
    ExpiredToken,

    /// Registration email not on the allowlist.
    #[error("Public registration is not allowed. Contact an administrator")]
    Forbidden,

    /// Email already registered.
    #[error("Email is already registered")]
    DuplicateAccount,

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// JWT encoding error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store and JWT errors are sanitized to prevent information disclosure
    /// about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Store(_) | AuthError::HashingFailed => "Internal server error".to_string(),
            AuthError::Jwt(_) => "Authentication failed".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_do_not_leak_internals() {
        let err = AuthError::Store(StoreError::Unavailable("pool exhausted".to_string()));
        assert_eq!(err.client_message(), "Internal server error");
        assert!(!err.client_message().contains("pool"));
    }

    #[test]
    fn rate_limited_carries_minutes() {
        let err = AuthError::RateLimited { retry_after_minutes: 15 };
        assert!(err.client_message().contains("15 minutes"));
    }
}
