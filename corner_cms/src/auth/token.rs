//! JWT access token issuance and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::errors::{AuthError, AuthResult};
use super::models::{AccessTokenClaims, UserRecord, UserRole};

/// Issues and verifies HS256-signed bearer tokens.
///
/// Verification is purely stateless: signature plus embedded expiry, no
/// store lookup. A token therefore stays valid for its full lifetime even
/// if the account behind it is later changed — accepted staleness window.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    /// Create a token service from the process-wide signing secret.
    ///
    /// `lifetime` is the window between `iat` and `exp` on issued tokens.
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Issue a signed access token for `user`.
    ///
    /// `role` is `Some` for login-issued tokens and `None` for
    /// register-issued ones.
    pub fn issue(&self, user: &UserRecord, role: Option<UserRole>) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            user_id: user.id,
            email: user.email.clone(),
            role,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode and verify a token, returning the embedded claims unchanged.
    ///
    /// Fails with [`AuthError::ExpiredToken`] when the embedded expiry is
    /// at or before now (no leeway), and [`AuthError::InvalidToken`] for
    /// any signature or structure failure.
    pub fn verify(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AccessTokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> UserRecord {
        UserRecord::new(
            "editor".to_string(),
            "editor@example.com".to_string(),
            "$argon2id$fake".to_string(),
            None,
            UserRole::Editor,
        )
    }

    fn service() -> TokenService {
        TokenService::new("test_secret_key_for_jwt", Duration::hours(24))
    }

    #[test]
    fn issue_verify_round_trip() {
        let user = test_user();
        let token = service().issue(&user, Some(UserRole::Editor)).unwrap();
        let claims = service().verify(&token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Some(UserRole::Editor));
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn register_issued_token_has_no_role() {
        let token = service().issue(&test_user(), None).unwrap();
        let claims = service().verify(&token).unwrap();
        assert_eq!(claims.role, None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = TokenService::new("test_secret_key_for_jwt", Duration::hours(-1));
        let token = expired.issue(&test_user(), None).unwrap();

        let err = service().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::ExpiredToken));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = service().issue(&test_user(), None).unwrap();

        // Flip one byte in the payload segment.
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let err = service().verify(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = service().verify("invalid.jwt.token").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().issue(&test_user(), None).unwrap();
        let other = TokenService::new("a_completely_different_secret", Duration::hours(24));

        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
