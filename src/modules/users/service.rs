//! Account lifecycle operations on user records.
//!
//! Role gating happens in the controllers (the access-control layer);
//! every function here assumes the caller was already admitted.

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::model::PasswordReset;
use crate::store::CredentialStore;
use crate::utils::email::{Notifier, NotifyPolicy, apply_notify_policy};
use crate::utils::errors::AppError;
use crate::utils::token::{activation_token_ttl, issue_reset_token, reset_token_ttl};

use super::model::{
    AccountStatus, ChangeRoleDto, ChangeStatusDto, CreateUserDto, UpdateUserDto, User,
    UserFilterParams, UserResponse, normalize_email,
};

pub struct UserService;

impl UserService {
    /// Creates a pending account (no password yet) and issues a 24-hour
    /// activation token. The activation email is best-effort: a notifier
    /// outage degrades the result but never rolls back the creation.
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn create_user(
        store: &dyn CredentialStore,
        notifier: &dyn Notifier,
        dto: CreateUserDto,
    ) -> Result<UserResponse, AppError> {
        let email = normalize_email(&dto.email);

        if store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "A user with that email already exists.",
            ));
        }

        let user = User::new_pending(dto.name.trim().to_string(), email, dto.role);
        store.insert_user(&user).await?;

        let reset = issue_reset_token(store, user.id, activation_token_ttl()).await?;

        apply_notify_policy(
            notifier
                .send_activation_email(&user.email, &user.name, &reset.token)
                .await,
            NotifyPolicy::BestEffort,
        )?;

        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(UserResponse::from(user))
    }

    /// Staff callers additionally see whether each account has a live
    /// reset/activation token outstanding, and its expiry; everyone else
    /// gets the plain view with both fields omitted.
    pub async fn list_users(
        store: &dyn CredentialStore,
        filter: &UserFilterParams,
        include_reset_state: bool,
    ) -> Result<Vec<UserResponse>, AppError> {
        let users = store.list_users(filter).await?;
        let mut responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

        if include_reset_state {
            let now = Utc::now();
            for response in &mut responses {
                // At most one live token per user by construction.
                let live = store.live_resets_for_user(response.id, now).await?;
                response.has_active_reset_token = Some(!live.is_empty());
                response.reset_token_expires_at = live.first().map(|r| r.expires_at);
            }
        }

        Ok(responses)
    }

    pub async fn get_user(store: &dyn CredentialStore, id: Uuid) -> Result<UserResponse, AppError> {
        let user = store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;
        Ok(UserResponse::from(user))
    }

    /// Staff overwrite of name/role/status; absent fields are untouched.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user(
        store: &dyn CredentialStore,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<UserResponse, AppError> {
        let mut user = store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;

        if let Some(name) = dto.name {
            user.name = name;
        }
        if let Some(role) = dto.role {
            user.role = role;
        }
        if let Some(status) = dto.account_status {
            user.account_status = status;
        }
        user.updated_at = Utc::now();
        store.save_user(&user).await?;

        Ok(UserResponse::from(user))
    }

    /// Direct role overwrite, no transition checks.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn change_role(
        store: &dyn CredentialStore,
        id: Uuid,
        dto: ChangeRoleDto,
    ) -> Result<UserResponse, AppError> {
        Self::overwrite(store, id, |user| user.role = dto.role).await
    }

    /// Direct status overwrite, no transition checks.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn change_status(
        store: &dyn CredentialStore,
        id: Uuid,
        dto: ChangeStatusDto,
    ) -> Result<UserResponse, AppError> {
        Self::overwrite(store, id, |user| user.account_status = dto.account_status).await
    }

    /// Soft delete: the record stays, the account becomes `inactive`.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn delete_user(store: &dyn CredentialStore, id: Uuid) -> Result<(), AppError> {
        Self::overwrite(store, id, |user| {
            user.account_status = AccountStatus::Inactive
        })
        .await?;
        Ok(())
    }

    /// Admin-initiated reset-on-behalf-of: issues a fresh 1-hour token,
    /// persists it, then notifies. Here the email is load-bearing: a
    /// notifier failure fails the operation, although the token has
    /// already been persisted by then (mutation-first ordering).
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn generate_reset_token(
        store: &dyn CredentialStore,
        notifier: &dyn Notifier,
        id: Uuid,
    ) -> Result<PasswordReset, AppError> {
        let user = store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;

        let reset = issue_reset_token(store, user.id, reset_token_ttl()).await?;

        apply_notify_policy(
            notifier
                .send_password_reset_email(&user.email, &user.name, &reset.token)
                .await,
            NotifyPolicy::Required,
        )?;

        Ok(reset)
    }

    async fn overwrite(
        store: &dyn CredentialStore,
        id: Uuid,
        apply: impl FnOnce(&mut User),
    ) -> Result<UserResponse, AppError> {
        let mut user = store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;

        apply(&mut user);
        user.updated_at = Utc::now();
        store.save_user(&user).await?;

        Ok(UserResponse::from(user))
    }
}
