//! PostgreSQL-backed credential store.
//!
//! Row structs decode with plain SQL types and convert into the domain
//! model at the boundary, so the domain enums stay free of database
//! derives. Queries use runtime binding throughout.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::modules::auth::model::PasswordReset;
use crate::modules::users::model::{AccountStatus, Role, User, UserFilterParams};

use super::CredentialStore;

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_digest: Option<String>,
    role: String,
    account_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_digest: row.password_digest,
            role: row.role.parse::<Role>()?,
            account_status: row.account_status.parse::<AccountStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ResetRow {
    id: Uuid,
    user_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

impl From<ResetRow> for PasswordReset {
    fn from(row: ResetRow) -> Self {
        PasswordReset {
            id: row.id,
            user_id: row.user_id,
            token: row.token,
            expires_at: row.expires_at,
            created_at: row.created_at,
            used_at: row.used_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_digest, role, account_status, created_at, updated_at";

const RESET_COLUMNS: &str = "id, user_id, token, expires_at, created_at, used_at";

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert_user(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_digest, role, account_status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_digest)
        .bind(user.role.as_str())
        .bind(user.account_status.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        Ok(())
    }

    async fn save_user(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users
             SET name = $2, email = $3, password_digest = $4, role = $5,
                 account_status = $6, updated_at = $7
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_digest)
        .bind(user.role.as_str())
        .bind(user.account_status.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to save user")?;

        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by id")?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        row.map(User::try_from).transpose()
    }

    async fn list_users(&self, filter: &UserFilterParams) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::text IS NULL OR role = $1)
               AND ($2::text IS NULL OR account_status = $2)
               AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR email ILIKE '%' || $3 || '%')
             ORDER BY created_at"
        ))
        .bind(filter.role.map(|r| r.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(&filter.search)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn insert_reset(&self, reset: &PasswordReset) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO password_resets (id, user_id, token, expires_at, created_at, used_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(reset.id)
        .bind(reset.user_id)
        .bind(&reset.token)
        .bind(reset.expires_at)
        .bind(reset.created_at)
        .bind(reset.used_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert password reset")?;

        Ok(())
    }

    async fn find_reset_by_token(&self, token: &str) -> anyhow::Result<Option<PasswordReset>> {
        let row = sqlx::query_as::<_, ResetRow>(&format!(
            "SELECT {RESET_COLUMNS} FROM password_resets WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch password reset by token")?;

        Ok(row.map(PasswordReset::from))
    }

    async fn mark_reset_used(&self, id: Uuid, used_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let result =
            sqlx::query("UPDATE password_resets SET used_at = $2 WHERE id = $1 AND used_at IS NULL")
                .bind(id)
                .bind(used_at)
                .execute(&self.pool)
                .await
                .context("Failed to mark password reset as used")?;

        Ok(result.rows_affected() == 1)
    }

    async fn invalidate_resets_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE password_resets SET used_at = $2 WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to invalidate password resets")?;

        Ok(())
    }

    async fn live_resets_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PasswordReset>> {
        let rows = sqlx::query_as::<_, ResetRow>(&format!(
            "SELECT {RESET_COLUMNS} FROM password_resets
             WHERE user_id = $1 AND used_at IS NULL AND expires_at > $2
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch live password resets")?;

        Ok(rows.into_iter().map(PasswordReset::from).collect())
    }
}
