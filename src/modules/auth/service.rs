//! Authentication and self-service password flows.

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::config::security::SecurityConfig;
use crate::modules::users::model::{AccountStatus, UserResponse, normalize_email};
use crate::store::CredentialStore;
use crate::utils::email::{Notifier, NotifyPolicy, apply_notify_policy};
use crate::utils::errors::AppError;
use crate::utils::jwt::create_session_token;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::token::{consume_reset_token, issue_reset_token, reset_token_ttl};

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest, SetPasswordRequest,
    UpdatePasswordRequest,
};

pub struct AuthService;

impl AuthService {
    /// Issues a session token for an active account with matching
    /// credentials. Pending and inactive accounts are rejected with the
    /// same generic message as a bad password, so the response does not
    /// reveal account state.
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn login(
        store: &dyn CredentialStore,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let user = store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password."))?;

        let digest = match (&user.password_digest, user.account_status) {
            (Some(digest), AccountStatus::Active) => digest,
            _ => return Err(AppError::unauthorized("Invalid email or password.")),
        };

        if !verify_password(&dto.password, digest).await? {
            return Err(AppError::unauthorized("Invalid email or password."));
        }

        let token = create_session_token(&user, jwt_config)?;

        Ok(LoginResponse {
            status: "Success",
            msg: "Logged in.".to_string(),
            token,
            user: UserResponse::from(user),
        })
    }

    /// Unified activation entry point: a live token plus the initial
    /// password transitions the account to `active`, exactly once. An
    /// account that is already active answers 409 (the token is still
    /// burned by the lookup).
    #[instrument(skip_all)]
    pub async fn set_password(
        store: &dyn CredentialStore,
        security: &SecurityConfig,
        dto: SetPasswordRequest,
    ) -> Result<UserResponse, AppError> {
        let now = Utc::now();
        let reset = consume_reset_token(store, &dto.token, now).await?;

        let mut user = store
            .find_user_by_id(reset.user_id)
            .await?
            .ok_or_else(|| AppError::validation("Invalid or expired token."))?;

        if user.account_status == AccountStatus::Active {
            return Err(AppError::conflict("Account is already active."));
        }

        user.password_digest = Some(hash_password(&dto.password, security.bcrypt_cost).await?);
        user.account_status = AccountStatus::Active;
        user.updated_at = now;
        store.save_user(&user).await?;

        // No token may remain live once the account has a password.
        store.invalidate_resets_for_user(user.id, now).await?;

        tracing::info!(user_id = %user.id, "account activated");
        Ok(UserResponse::from(user))
    }

    /// Issues a superseding 1-hour reset token when the email is
    /// registered. The caller answers identically either way, so the
    /// endpoint cannot be used to enumerate accounts.
    #[instrument(skip_all)]
    pub async fn forgot_password(
        store: &dyn CredentialStore,
        notifier: &dyn Notifier,
        dto: ForgotPasswordRequest,
    ) -> Result<(), AppError> {
        let email = normalize_email(&dto.email);

        let Some(user) = store.find_user_by_email(&email).await? else {
            tracing::debug!("password reset requested for unregistered email");
            return Ok(());
        };

        let reset = issue_reset_token(store, user.id, reset_token_ttl()).await?;

        apply_notify_policy(
            notifier
                .send_password_reset_email(&user.email, &user.name, &reset.token)
                .await,
            NotifyPolicy::BestEffort,
        )
    }

    /// Consumes a live token and replaces the stored digest. Account
    /// status is deliberately untouched: activation is the only path to
    /// `active`.
    #[instrument(skip_all)]
    pub async fn reset_password(
        store: &dyn CredentialStore,
        security: &SecurityConfig,
        dto: ResetPasswordRequest,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let reset = consume_reset_token(store, &dto.token, now).await?;

        let mut user = store
            .find_user_by_id(reset.user_id)
            .await?
            .ok_or_else(|| AppError::validation("Invalid or expired token."))?;

        user.password_digest = Some(hash_password(&dto.new_password, security.bcrypt_cost).await?);
        user.updated_at = now;
        store.save_user(&user).await?;

        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }

    /// Authenticated self-service path: verifies the current password
    /// before replacing the digest. No token involved.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn update_password(
        store: &dyn CredentialStore,
        security: &SecurityConfig,
        user_id: Uuid,
        dto: UpdatePasswordRequest,
    ) -> Result<(), AppError> {
        let mut user = store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;

        let verified = match &user.password_digest {
            Some(digest) => verify_password(&dto.old_password, digest).await?,
            None => false,
        };
        if !verified {
            return Err(AppError::validation("Invalid credentials."));
        }

        user.password_digest = Some(hash_password(&dto.new_password, security.bcrypt_cost).await?);
        user.updated_at = Utc::now();
        store.save_user(&user).await?;

        Ok(())
    }
}
