//! Authentication models: session-token claims, password-reset records and
//! the auth request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::model::{Role, UserResponse};

/// Claims embedded in a session token. Derived from the credential record
/// at login time, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
}

/// One password-set/reset request, append-only.
///
/// The token itself is opaque: validity is established purely by lookup
/// (`used_at` unset) plus expiry comparison. Issuing a new token for a user
/// marks every outstanding one used, so at most one token is live per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordReset {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Live means consumable: neither used nor expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired(now)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub status: &'static str,
    pub msg: String,
    pub token: String,
    pub user: UserResponse,
}

/// Unified activation entry point: a valid token plus the initial password
/// moves a non-active account to `active`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Generic `{status, msg}` success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: &'static str,
    pub msg: String,
}

impl MessageResponse {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            status: "Success",
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reset(expires_in: Duration, used: bool) -> PasswordReset {
        let now = Utc::now();
        PasswordReset {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "deadbeef".into(),
            expires_at: now + expires_in,
            created_at: now,
            used_at: used.then_some(now),
        }
    }

    #[test]
    fn live_token_is_neither_used_nor_expired() {
        let r = reset(Duration::hours(1), false);
        assert!(r.is_live(Utc::now()));
    }

    #[test]
    fn expired_token_is_not_live() {
        let r = reset(Duration::seconds(-1), false);
        assert!(r.is_expired(Utc::now()));
        assert!(!r.is_live(Utc::now()));
    }

    #[test]
    fn used_token_is_not_live() {
        let r = reset(Duration::hours(1), true);
        assert!(r.is_used());
        assert!(!r.is_live(Utc::now()));
    }
}
