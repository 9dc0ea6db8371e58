use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
    SetPasswordRequest, UpdatePasswordRequest,
};
use super::service::AuthService;

/// Error envelope: `{"status": "Error", "msg": ...}`.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub msg: String,
}

/// Login and receive a 24-hour session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials or non-active account", body = ErrorResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(state.store.as_ref(), &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// Set the initial password using an activation token
#[utoipa::path(
    post,
    path = "/api/auth/set-password",
    request_body = SetPasswordRequest,
    responses(
        (status = 200, description = "Password set, account active", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse),
        (status = 409, description = "Account is already active", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn set_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::set_password(state.store.as_ref(), &state.security_config, dto).await?;
    Ok(Json(MessageResponse::success(
        "Password has been set. You can now log in.",
    )))
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement, sent whether or not the email is registered", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::forgot_password(state.store.as_ref(), state.notifier.as_ref(), dto).await?;
    Ok(Json(MessageResponse::success(
        "If an account exists with that email, a password reset link has been sent.",
    )))
}

/// Reset the password using a reset token
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired token, or password too short", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::reset_password(state.store.as_ref(), &state.security_config, dto).await?;
    Ok(Json(MessageResponse::success(
        "Password has been reset. You can now log in with your new password.",
    )))
}

/// Change the password of the authenticated user
#[utoipa::path(
    post,
    path = "/api/auth/update-password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn update_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    tracing::debug!(actor = %auth_user.email(), "password update requested");
    AuthService::update_password(state.store.as_ref(), &state.security_config, user_id, dto)
        .await?;
    Ok(Json(MessageResponse::success("Password updated.")))
}
