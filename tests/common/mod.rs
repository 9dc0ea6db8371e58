//! Shared test fixtures: in-memory state, a recording notifier, and
//! request helpers that drive the real router.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use classroom_manager::config::jwt::{JwtConfig, SESSION_TTL_SECS};
use classroom_manager::config::security::SecurityConfig;
use classroom_manager::modules::users::model::{AccountStatus, Role, User};
use classroom_manager::state::AppState;
use classroom_manager::store::CredentialStore;
use classroom_manager::store::memory::MemoryCredentialStore;
use classroom_manager::utils::email::Notifier;
use classroom_manager::utils::errors::AppError;
use classroom_manager::utils::jwt::create_session_token;
use classroom_manager::utils::password::hash_password;

pub const TEST_BCRYPT_COST: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailKind {
    Activation,
    PasswordReset,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub kind: EmailKind,
    pub to: String,
    pub token: String,
}

/// Records every delivery; optionally fails them all, for exercising the
/// notify policies.
pub struct RecordingNotifier {
    fail: bool,
    pub sent: Mutex<Vec<SentEmail>>,
}

impl RecordingNotifier {
    pub fn ok() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    async fn record(&self, kind: EmailKind, to: &str, token: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::internal(anyhow::anyhow!("smtp unreachable")));
        }
        self.sent.lock().await.push(SentEmail {
            kind,
            to: to.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_activation_email(
        &self,
        to_email: &str,
        _to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        self.record(EmailKind::Activation, to_email, token).await
    }

    async fn send_password_reset_email(
        &self,
        to_email: &str,
        _to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        self.record(EmailKind::PasswordReset, to_email, token).await
    }
}

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryCredentialStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn test_context() -> TestContext {
    test_context_with_notifier(RecordingNotifier::ok())
}

pub fn test_context_with_notifier(notifier: RecordingNotifier) -> TestContext {
    let store = Arc::new(MemoryCredentialStore::new());
    let notifier = Arc::new(notifier);

    let state = AppState {
        store: store.clone() as Arc<dyn CredentialStore>,
        notifier: notifier.clone() as Arc<dyn Notifier>,
        jwt_config: JwtConfig {
            secret: "test-secret-key-not-for-production".to_string(),
            session_ttl_secs: SESSION_TTL_SECS,
        },
        security_config: SecurityConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
        },
    };

    TestContext {
        state,
        store,
        notifier,
    }
}

/// Inserts a user directly into the store, hashing the password when one
/// is given.
pub async fn seed_user(
    ctx: &TestContext,
    name: &str,
    email: &str,
    password: Option<&str>,
    role: Role,
    status: AccountStatus,
) -> User {
    let mut user = User::new_pending(name.to_string(), email.to_string(), role);
    user.account_status = status;
    if let Some(password) = password {
        user.password_digest = Some(hash_password(password, TEST_BCRYPT_COST).await.unwrap());
    }
    ctx.store.insert_user(&user).await.unwrap();
    user
}

pub fn session_token_for(ctx: &TestContext, user: &User) -> String {
    create_session_token(user, &ctx.state.jwt_config).unwrap()
}

/// Sends one request through a fresh clone of the router and returns the
/// status plus the parsed JSON body (Null when the body is empty).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}
