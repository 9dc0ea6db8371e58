//! Unit tests for session-token creation and verification.

use classroom_manager::config::jwt::{JwtConfig, SESSION_TTL_SECS, TOKEN_ISSUER};
use classroom_manager::modules::users::model::{AccountStatus, Role, User};
use classroom_manager::utils::jwt::{create_session_token, verify_session_token};

fn config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-not-for-production".to_string(),
        session_ttl_secs: SESSION_TTL_SECS,
    }
}

fn sample_user() -> User {
    let mut user = User::new_pending(
        "Ada Lovelace".to_string(),
        "ada@example.com".to_string(),
        Role::Teacher,
    );
    user.account_status = AccountStatus::Active;
    user
}

#[test]
fn token_round_trips_identity_claims() {
    let config = config();
    let user = sample_user();

    let token = create_session_token(&user, &config).unwrap();
    let claims = verify_session_token(&token, &config).unwrap();

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.name, user.name);
    assert_eq!(claims.role, Role::Teacher);
    assert_eq!(claims.iss, TOKEN_ISSUER);
    assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECS as usize);
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let user = sample_user();
    let token = create_session_token(
        &user,
        &JwtConfig {
            secret: "some-other-secret".to_string(),
            session_ttl_secs: SESSION_TTL_SECS,
        },
    )
    .unwrap();

    let err = verify_session_token(&token, &config()).unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
}

#[test]
fn expired_token_is_reported_as_expired() {
    let user = sample_user();
    // Negative TTL backdates the expiry well past the validation leeway.
    let config = JwtConfig {
        secret: config().secret,
        session_ttl_secs: -3600,
    };

    let token = create_session_token(&user, &config).unwrap();
    let err = verify_session_token(&token, &config).unwrap_err();
    assert!(err.to_string().contains("expired"));
}

#[test]
fn garbage_is_not_a_token() {
    let err = verify_session_token("not-a-jwt", &config()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid token.");
}

#[test]
fn tampered_token_is_rejected() {
    let config = config();
    let token = create_session_token(&sample_user(), &config).unwrap();

    // Flip a character in the payload segment.
    let mut bytes = token.into_bytes();
    let mid = bytes.len() / 2;
    bytes[mid] = if bytes[mid] == b'a' { b'b' } else { b'a' };
    let tampered = String::from_utf8(bytes).unwrap();

    assert!(verify_session_token(&tampered, &config).is_err());
}
