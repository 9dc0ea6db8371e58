//! Role-based authorization gate.
//!
//! One set of functions gates every protected operation, instead of ad-hoc
//! role comparisons scattered across handlers. All checks are pure reads of
//! the verified claims; nothing here mutates stored state.

use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{Role, STAFF_ROLES};
use crate::utils::errors::AppError;

/// Admits the request when the verified role is in the accepted set.
pub fn require_any_role(auth: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&auth.role()) {
        return Ok(());
    }

    Err(AppError::forbidden(format!(
        "Access denied. Required roles: {}.",
        allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

/// Admin-or-supervisor gate for account management operations.
pub fn require_staff(auth: &AuthUser) -> Result<(), AppError> {
    require_any_role(auth, &STAFF_ROLES)
}

/// Ownership override: the acting identity may operate on its own resource
/// regardless of role, otherwise the role gate applies.
pub fn require_self_or_any_role(
    auth: &AuthUser,
    owner_id: Uuid,
    allowed: &[Role],
) -> Result<(), AppError> {
    if auth.user_id()? == owner_id {
        return Ok(());
    }

    require_any_role(auth, allowed).map_err(|_| {
        AppError::forbidden("Access denied. You can only access your own resources.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::jwt::TOKEN_ISSUER;
    use crate::modules::auth::model::Claims;

    fn auth_user(role: Role, id: Uuid) -> AuthUser {
        AuthUser(Claims {
            sub: id.to_string(),
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
            role,
            iss: TOKEN_ISSUER.to_string(),
            iat: 1_234_567_890,
            exp: 9_999_999_999,
        })
    }

    #[test]
    fn staff_roles_pass_the_staff_gate() {
        for role in [Role::Admin, Role::Supervisor] {
            assert!(require_staff(&auth_user(role, Uuid::new_v4())).is_ok());
        }
    }

    #[test]
    fn non_staff_roles_fail_the_staff_gate() {
        for role in [Role::Student, Role::Teacher] {
            let err = require_staff(&auth_user(role, Uuid::new_v4())).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
        }
    }

    #[test]
    fn owner_passes_regardless_of_role() {
        let id = Uuid::new_v4();
        let auth = auth_user(Role::Student, id);
        assert!(require_self_or_any_role(&auth, id, &STAFF_ROLES).is_ok());
    }

    #[test]
    fn non_owner_without_role_is_forbidden() {
        let auth = auth_user(Role::Student, Uuid::new_v4());
        let err = require_self_or_any_role(&auth, Uuid::new_v4(), &STAFF_ROLES).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn non_owner_with_allowed_role_passes() {
        let auth = auth_user(Role::Supervisor, Uuid::new_v4());
        assert!(require_self_or_any_role(&auth, Uuid::new_v4(), &STAFF_ROLES).is_ok());
    }
}
