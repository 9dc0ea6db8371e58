//! Shared application state.
//!
//! Built once at startup and cloned into every handler. The store and the
//! notifier sit behind trait objects so the Postgres/SMTP pair in
//! production and the in-memory/recording pair in tests satisfy the same
//! state shape.

use std::sync::Arc;

use crate::config::database::init_db_pool;
use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::config::security::SecurityConfig;
use crate::store::CredentialStore;
use crate::store::postgres::PgCredentialStore;
use crate::utils::email::{EmailService, Notifier};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub notifier: Arc<dyn Notifier>,
    pub jwt_config: JwtConfig,
    pub security_config: SecurityConfig,
}

/// Initializes production state: Postgres store, SMTP notifier, env
/// configuration. Fails when the database is unreachable or the signing
/// secret is missing.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let pool = init_db_pool().await?;

    Ok(AppState {
        store: Arc::new(PgCredentialStore::new(pool)),
        notifier: Arc::new(EmailService::new(EmailConfig::from_env())),
        jwt_config: JwtConfig::from_env()?,
        security_config: SecurityConfig::from_env(),
    })
}
