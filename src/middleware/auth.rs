//! Authentication extractor.
//!
//! [`AuthUser`] validates the `Authorization: Bearer <token>` header and
//! exposes the verified session claims to handlers. Extraction runs before
//! any handler logic, so a missing, malformed, invalid or expired
//! credential answers 401 without touching the store.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::auth::model::Claims;
use crate::modules::users::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_session_token;

/// Extractor that validates the session token and carries the claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user id in token."))
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("No authorization header provided."))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::unauthorized("Authorization header must be of the form Bearer <token>.")
            })?;

        let claims = verify_session_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::jwt::TOKEN_ISSUER;

    fn auth_user(sub: String) -> AuthUser {
        AuthUser(Claims {
            sub,
            email: "claims@example.com".to_string(),
            name: "Claims Holder".to_string(),
            role: Role::Supervisor,
            iss: TOKEN_ISSUER.to_string(),
            iat: 1_234_567_890,
            exp: 9_999_999_999,
        })
    }

    #[test]
    fn accessors_expose_the_verified_claims() {
        let id = Uuid::new_v4();
        let auth = auth_user(id.to_string());

        assert_eq!(auth.user_id().unwrap(), id);
        assert_eq!(auth.role(), Role::Supervisor);
        assert_eq!(auth.email(), "claims@example.com");
    }

    #[test]
    fn non_uuid_subject_is_unauthorized() {
        let auth = auth_user("not-a-uuid".to_string());
        assert!(auth.user_id().is_err());
    }
}
