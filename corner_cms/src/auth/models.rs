//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Editorial role attached to every user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Editor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Editor => "editor",
        }
    }

    /// Parse a stored role string, defaulting to `Editor` for anything
    /// unrecognized (matches how seeded records are read back).
    pub fn from_str_or_editor(value: &str) -> Self {
        match value {
            "super_admin" => UserRole::SuperAdmin,
            _ => UserRole::Editor,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record as persisted in the credential store.
///
/// The email is the sole login identifier and must be unique (stored
/// case-sensitively). Records are created at registration or seed time
/// and never deleted by this crate; password change is a known gap.
#[derive(Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC-format hash. Never logged, never serialized.
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        full_name: Option<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            full_name,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

// The hash must not leak through debug output.
impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Login request body for `POST /api/auth/local`.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    /// Email address; the only identifier accepted for login.
    pub identifier: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration request body for `POST /api/auth/register`.
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// JWT claims embedded in every access token.
///
/// `role` is present on login-issued tokens and absent on
/// register-issued ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub user_id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(UserRole::from_str_or_editor("super_admin"), UserRole::SuperAdmin);
        assert_eq!(UserRole::from_str_or_editor("editor"), UserRole::Editor);
        assert_eq!(UserRole::from_str_or_editor("garbage"), UserRole::Editor);
        assert_eq!(UserRole::SuperAdmin.as_str(), "super_admin");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let user = UserRecord::new(
            "editor".to_string(),
            "editor@example.com".to_string(),
            "$argon2id$fake".to_string(),
            None,
            UserRole::Editor,
        );
        let rendered = format!("{user:?}");
        assert!(!rendered.contains("argon2id"));
        assert!(rendered.contains("<redacted>"));

        let login = LoginRequest {
            identifier: "editor@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{login:?}").contains("hunter2"));
    }
}
