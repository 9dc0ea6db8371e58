use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    change_role, change_status, create_user, delete_user, generate_reset_token, get_user,
    get_users, update_user,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/role", put(change_role))
        .route("/{id}/status", put(change_status))
        .route("/{id}/reset-token", post(generate_reset_token))
}
