use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{forgot_password, login, reset_password, set_password, update_password};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/set-password", post(set_password))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/update-password", post(update_password))
}
