//! Application error type and HTTP response conversion.
//!
//! Every fallible operation in the crate surfaces an [`AppError`]. The
//! variants follow the error taxonomy of the API: validation (400),
//! authentication (401), authorization (403), not found (404), conflict
//! (409) and internal (500). Conversion into an HTTP response produces the
//! stable `{"status": "Error", "msg": ...}` wire shape; internal error
//! detail is logged and never leaked to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input, including invalid or expired opaque
    /// tokens and bad credentials on self-service password changes.
    #[error("{0}")]
    Validation(String),

    /// Missing/invalid/expired session token.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid session, insufficient role.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate email, already-active account.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure (store unavailable, notifier outage on a
    /// load-bearing path). Detail stays server-side.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let msg = match &self {
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "status": "Error",
            "msg": msg,
        }));

        (status, body).into_response()
    }
}
