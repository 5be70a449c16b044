//! Integration tests for the authentication system.
//!
//! Tests registration, login, lockout, and token validation flows against
//! the in-memory store, with an injected clock so the lockout window can
//! be simulated instead of slept through.

use chrono::{Duration, Utc};
use corner_cms::auth::{
    AuthConfig, AuthError, AuthManager, LoginRequest, RegisterRequest, UserRole,
};
use corner_cms::db::MemoryStore;
use corner_cms::security::Clock;
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

/// Clock starting at a fixed instant, advanced by storing an offset.
fn mock_clock() -> (Arc<AtomicI64>, Clock) {
    let base = Utc::now();
    let offset_secs = Arc::new(AtomicI64::new(0));
    let handle = Arc::clone(&offset_secs);
    let clock: Clock = Arc::new(move || base + Duration::seconds(handle.load(Ordering::SeqCst)));
    (offset_secs, clock)
}

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test_secret_key_for_jwt".to_string(),
        allowlist: vec!["a@b.com".to_string(), "second@b.com".to_string()],
        ..AuthConfig::default()
    }
}

/// Auth manager over a fresh memory store with a controllable clock.
fn setup_auth_manager() -> (Arc<AtomicI64>, AuthManager) {
    let (offset, clock) = mock_clock();
    let manager = AuthManager::with_clock(Arc::new(MemoryStore::new()), test_config(), clock);
    (offset, manager)
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        username: "editor".to_string(),
        email: email.to_string(),
        password: "CorrectHorse9!".to_string(),
        full_name: Some("Test Editor".to_string()),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        identifier: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let (_, auth) = setup_auth_manager();

    let (user, register_token) = auth
        .register(register_request("a@b.com"))
        .await
        .expect("registration should succeed");

    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.role, UserRole::Editor);

    // Register-issued tokens verify but carry no role claim.
    let claims = auth.verify_access_token(&register_token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.role, None);

    let (logged_in, login_token) = auth
        .login(login_request("a@b.com", "CorrectHorse9!"))
        .await
        .expect("login should succeed");

    assert_eq!(logged_in.id, user.id);
    let claims = auth.verify_access_token(&login_token).unwrap();
    assert_eq!(claims.role, Some(UserRole::Editor));
    assert_eq!(claims.email, "a@b.com");
}

#[tokio::test]
async fn register_outside_allowlist_is_forbidden() {
    let (_, auth) = setup_auth_manager();

    let result = auth.register(register_request("intruder@evil.com")).await;
    assert!(matches!(result.unwrap_err(), AuthError::Forbidden));
}

#[tokio::test]
async fn register_duplicate_email() {
    let (_, auth) = setup_auth_manager();

    auth.register(register_request("a@b.com"))
        .await
        .expect("first registration should succeed");

    let result = auth.register(register_request("a@b.com")).await;
    assert!(matches!(result.unwrap_err(), AuthError::DuplicateAccount));
}

#[tokio::test]
async fn login_wrong_password() {
    let (_, auth) = setup_auth_manager();
    auth.register(register_request("a@b.com")).await.unwrap();

    let result = auth.login(login_request("a@b.com", "WrongPass1!")).await;
    assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
}

#[tokio::test]
async fn login_nonexistent_user_matches_wrong_password() {
    let (_, auth) = setup_auth_manager();
    auth.register(register_request("a@b.com")).await.unwrap();

    let unknown = auth
        .login(login_request("ghost@b.com", "CorrectHorse9!"))
        .await
        .unwrap_err();
    let wrong = auth
        .login(login_request("a@b.com", "WrongPass1!"))
        .await
        .unwrap_err();

    // Same kind, same message: account existence must not leak.
    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert_eq!(unknown.client_message(), wrong.client_message());
}

#[tokio::test]
async fn sixth_attempt_within_window_is_rate_limited() {
    let (offset, auth) = setup_auth_manager();
    auth.register(register_request("a@b.com")).await.unwrap();

    for _ in 0..5 {
        let result = auth.login(login_request("a@b.com", "wrong")).await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    // 6th attempt with the CORRECT password is still rejected.
    let result = auth.login(login_request("a@b.com", "CorrectHorse9!")).await;
    match result.unwrap_err() {
        AuthError::RateLimited { retry_after_minutes } => {
            assert_eq!(retry_after_minutes, 15);
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }

    // 16 simulated minutes later the same call succeeds and counters reset.
    offset.store(16 * 60, Ordering::SeqCst);
    let (user, token) = auth
        .login(login_request("a@b.com", "CorrectHorse9!"))
        .await
        .expect("login after window should succeed");
    assert_eq!(user.email, "a@b.com");
    assert!(auth.verify_access_token(&token).is_ok());

    // Counters are back at zero: four fresh failures do not lock.
    for _ in 0..4 {
        let _ = auth.login(login_request("a@b.com", "wrong")).await;
    }
    let result = auth.login(login_request("a@b.com", "CorrectHorse9!")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn unknown_identifier_locks_out_too() {
    let (_, auth) = setup_auth_manager();

    for _ in 0..5 {
        let result = auth.login(login_request("ghost@b.com", "whatever")).await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    let result = auth.login(login_request("ghost@b.com", "whatever")).await;
    assert!(matches!(result.unwrap_err(), AuthError::RateLimited { .. }));
}

#[tokio::test]
async fn successful_login_clears_failure_count() {
    let (_, auth) = setup_auth_manager();
    auth.register(register_request("a@b.com")).await.unwrap();

    // Fail twice, then succeed.
    for _ in 0..2 {
        let _ = auth.login(login_request("a@b.com", "wrong")).await;
    }
    auth.login(login_request("a@b.com", "CorrectHorse9!"))
        .await
        .expect("login should clear the counter");

    // Four more failures stay under the fresh limit...
    for _ in 0..4 {
        let result = auth.login(login_request("a@b.com", "wrong")).await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    // ...and the fifth failure, not the third, triggers the lockout.
    let result = auth.login(login_request("a@b.com", "wrong")).await;
    assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    let result = auth.login(login_request("a@b.com", "CorrectHorse9!")).await;
    assert!(matches!(result.unwrap_err(), AuthError::RateLimited { .. }));
}

#[tokio::test]
async fn lockout_is_per_identifier() {
    let (_, auth) = setup_auth_manager();
    auth.register(register_request("a@b.com")).await.unwrap();
    auth.register(register_request("second@b.com")).await.unwrap();

    for _ in 0..5 {
        let _ = auth.login(login_request("a@b.com", "wrong")).await;
    }

    assert!(matches!(
        auth.login(login_request("a@b.com", "CorrectHorse9!")).await.unwrap_err(),
        AuthError::RateLimited { .. }
    ));

    // The other account is untouched.
    auth.login(login_request("second@b.com", "CorrectHorse9!"))
        .await
        .expect("other identifiers must stay unlocked");
}

#[tokio::test]
async fn concurrent_failures_trigger_exactly_one_lockout_threshold() {
    let (_, auth) = setup_auth_manager();
    let auth = Arc::new(auth);

    let mut join_set = tokio::task::JoinSet::new();
    for _ in 0..20 {
        let auth = Arc::clone(&auth);
        join_set.spawn(async move {
            auth.login(login_request("a@b.com", "wrong")).await.unwrap_err()
        });
    }

    let mut total = 0;
    while let Some(result) = join_set.join_next().await {
        match result.unwrap() {
            AuthError::InvalidCredentials | AuthError::RateLimited { .. } => total += 1,
            other => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(total, 20);

    // All twenty failures were counted without losing an update, so the
    // identifier is locked for any follow-up attempt.
    let result = auth.login(login_request("a@b.com", "wrong")).await;
    assert!(matches!(result.unwrap_err(), AuthError::RateLimited { .. }));
}

#[tokio::test]
async fn expired_token_is_rejected_by_manager() {
    let (_, auth_manager) = setup_auth_manager();

    // A sibling manager with an already-elapsed lifetime issues tokens
    // that are expired on arrival.
    let (_, clock) = mock_clock();
    let expired_manager = AuthManager::with_clock(
        Arc::new(MemoryStore::new()),
        AuthConfig {
            token_lifetime: Duration::hours(-1),
            ..test_config()
        },
        clock,
    );

    let (_, token) = expired_manager
        .register(register_request("a@b.com"))
        .await
        .unwrap();

    let err = auth_manager.verify_access_token(&token).unwrap_err();
    assert!(matches!(err, AuthError::ExpiredToken));
}

#[tokio::test]
async fn token_survives_after_lockout_state_is_gone() {
    // Token validity is a function of signature and expiry only; nothing
    // about lockout or store state can invalidate an issued token.
    let (_, auth) = setup_auth_manager();
    auth.register(register_request("a@b.com")).await.unwrap();
    let (_, token) = auth
        .login(login_request("a@b.com", "CorrectHorse9!"))
        .await
        .unwrap();

    for _ in 0..6 {
        let _ = auth.login(login_request("a@b.com", "wrong")).await;
    }

    let claims = auth.verify_access_token(&token).unwrap();
    assert_eq!(claims.email, "a@b.com");
}
