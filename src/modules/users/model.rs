//! User data models and DTOs.
//!
//! # Core types
//!
//! - [`User`] - credential record as persisted in the store
//! - [`Role`] - student / teacher / supervisor / admin
//! - [`AccountStatus`] - pending / active / inactive lifecycle states
//! - [`UserResponse`] - client-facing view, never carries the password
//!   digest or token material
//!
//! # Request DTOs
//!
//! - [`CreateUserDto`] - staff creates a pending user (no password yet)
//! - [`UpdateUserDto`] - staff overwrites name/role/status
//! - [`ChangeRoleDto`] / [`ChangeStatusDto`] - targeted overwrites
//! - [`UserFilterParams`] - role/status/search query filters on listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Determines the set of permitted operations for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Supervisor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Supervisor => "supervisor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "supervisor" => Ok(Role::Supervisor),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow::anyhow!("invalid role: {other}")),
        }
    }
}

/// Roles allowed to manage accounts (create users, change role/status,
/// issue reset tokens on behalf of a user).
pub const STAFF_ROLES: [Role; 2] = [Role::Admin, Role::Supervisor];

/// Canonical email form: trimmed and lowercased. Applied to every email
/// that enters the system so the unique-email rule is case-insensitive.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Account lifecycle state.
///
/// `Pending` accounts have no usable password and cannot log in. The only
/// transition to `Active` is a valid activation-token submission.
/// `Inactive` is the soft-deleted state; staff can flip it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AccountStatus::Pending),
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(anyhow::anyhow!("invalid account status: {other}")),
        }
    }
}

/// A credential record.
///
/// Not serializable on purpose: handlers go through [`UserResponse`], which
/// cannot leak the digest.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_digest: Option<String>,
    pub role: Role,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh pending record. Email is expected to be normalized
    /// (trimmed, lowercased) by the caller.
    pub fn new_pending(name: String, email: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_digest: None,
            role,
            account_status: AccountStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Client-facing view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Staff listings only: whether a live reset/activation token is
    /// outstanding for the account. Omitted everywhere else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_active_reset_token: Option<bool>,
    /// Staff listings only: expiry of the live token, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token_expires_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            account_status: user.account_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
            has_active_reset_token: None,
            reset_token_expires_at: None,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Defaults to `student` when omitted, matching the account-creation
    /// flow where staff add whole batches of students.
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Student
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub role: Option<Role>,
    pub account_status: Option<AccountStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangeRoleDto {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangeStatusDto {
    pub account_status: AccountStatus,
}

/// Query parameters for filtering users. All filters are optional and
/// combine with AND; `search` matches name or email, case-insensitively.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    pub search: Option<String>,
}

/// Response for the admin-initiated reset-token issue operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetTokenResponse {
    pub status: &'static str,
    pub msg: String,
    pub reset_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Response wrapper for a created user.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    pub status: &'static str,
    pub msg: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Student, Role::Teacher, Role::Supervisor, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            AccountStatus::Pending,
            AccountStatus::Active,
            AccountStatus::Inactive,
        ] {
            assert_eq!(status.as_str().parse::<AccountStatus>().unwrap(), status);
        }
        assert!("deleted".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn new_pending_user_has_no_digest() {
        let user = User::new_pending("Jo".into(), "jo@x.com".into(), Role::Student);
        assert_eq!(user.account_status, AccountStatus::Pending);
        assert!(user.password_digest.is_none());
    }
}
