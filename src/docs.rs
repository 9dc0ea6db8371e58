//! OpenAPI documentation. The document is served as JSON at
//! `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
    SetPasswordRequest, UpdatePasswordRequest,
};
use crate::modules::users::model::{
    AccountStatus, ChangeRoleDto, ChangeStatusDto, CreateUserDto, CreatedUserResponse,
    ResetTokenResponse, Role, UpdateUserDto, UserResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::set_password,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::auth::controller::update_password,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::change_role,
        crate::modules::users::controller::change_status,
        crate::modules::users::controller::generate_reset_token,
    ),
    components(
        schemas(
            Role,
            AccountStatus,
            UserResponse,
            CreateUserDto,
            CreatedUserResponse,
            UpdateUserDto,
            ChangeRoleDto,
            ChangeStatusDto,
            ResetTokenResponse,
            LoginRequest,
            LoginResponse,
            SetPasswordRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            UpdatePasswordRequest,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and password lifecycle"),
        (name = "Users", description = "Account management")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
