use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{require_self_or_any_role, require_staff};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    ChangeRoleDto, ChangeStatusDto, CreateUserDto, CreatedUserResponse, ResetTokenResponse,
    STAFF_ROLES, UpdateUserDto, UserFilterParams, UserResponse,
};
use super::service::UserService;

/// Create a user (admin/supervisor only)
///
/// The account starts `pending` with no password; an activation token is
/// issued and mailed best-effort.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Pending user created", body = CreatedUserResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), AppError> {
    require_staff(&auth_user)?;

    let user = UserService::create_user(state.store.as_ref(), state.notifier.as_ref(), dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            status: "Success",
            msg: "User created.".to_string(),
            user,
        }),
    ))
}

/// List users with optional role/status/search filters
///
/// Admin/supervisor callers additionally see `has_active_reset_token` and
/// `reset_token_expires_at` per account.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid session token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filter): Query<UserFilterParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    // Staff listings carry the live reset-token state per account.
    let include_reset_state = STAFF_ROLES.contains(&auth_user.role());
    let users =
        UserService::list_users(state.store.as_ref(), &filter, include_reset_state).await?;
    Ok(Json(users))
}

/// Get a user by id (self or admin/supervisor)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 403, description = "Not the owner and insufficient role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    require_self_or_any_role(&auth_user, id, &STAFF_ROLES)?;

    let user = UserService::get_user(state.store.as_ref(), id).await?;
    Ok(Json(user))
}

/// Update a user's name/role/status (admin/supervisor only)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    require_staff(&auth_user)?;

    let user = UserService::update_user(state.store.as_ref(), id, dto).await?;
    Ok(Json(user))
}

/// Soft-delete a user (admin/supervisor only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    responses(
        (status = 200, description = "User set to inactive", body = MessageResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    require_staff(&auth_user)?;

    UserService::delete_user(state.store.as_ref(), id).await?;
    Ok(Json(MessageResponse::success(
        "User deleted (set to inactive).",
    )))
}

/// Change a user's role (admin/supervisor only)
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    request_body = ChangeRoleDto,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn change_role(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ChangeRoleDto>,
) -> Result<Json<UserResponse>, AppError> {
    require_staff(&auth_user)?;

    let user = UserService::change_role(state.store.as_ref(), id, dto).await?;
    Ok(Json(user))
}

/// Change a user's account status (admin/supervisor only)
#[utoipa::path(
    put,
    path = "/api/users/{id}/status",
    request_body = ChangeStatusDto,
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 400, description = "Invalid status value", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn change_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ChangeStatusDto>,
) -> Result<Json<UserResponse>, AppError> {
    require_staff(&auth_user)?;

    let user = UserService::change_status(state.store.as_ref(), id, dto).await?;
    Ok(Json(user))
}

/// Issue a fresh reset token for a user (admin/supervisor only)
///
/// Unlike account creation, the email here is load-bearing: a notifier
/// failure fails the request even though the token was already persisted.
#[utoipa::path(
    post,
    path = "/api/users/{id}/reset-token",
    responses(
        (status = 200, description = "Reset token issued", body = ResetTokenResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Notification failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn generate_reset_token(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResetTokenResponse>, AppError> {
    require_staff(&auth_user)?;

    let reset =
        UserService::generate_reset_token(state.store.as_ref(), state.notifier.as_ref(), id)
            .await?;

    Ok(Json(ResetTokenResponse {
        status: "Success",
        msg: "Reset token issued.".to_string(),
        reset_token: reset.token,
        expires_at: reset.expires_at,
    }))
}
