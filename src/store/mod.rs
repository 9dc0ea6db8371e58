//! Credential store abstraction.
//!
//! The persistence layer is the single source of truth and the only shared
//! state between requests. [`CredentialStore`] expresses exactly the
//! operations the lifecycle core needs (by-value reads and whole-record
//! writes on single user records, plus the append-only password-reset
//! collection) so the Postgres backend and the in-memory test backend
//! satisfy the same contract.
//!
//! Concurrent token issuance for the same user converges to
//! last-writer-wins: `invalidate_resets_for_user` followed by
//! `insert_reset` leaves exactly one live token, with no cross-request
//! locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::auth::model::PasswordReset;
use crate::modules::users::model::{User, UserFilterParams};

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> anyhow::Result<()>;

    /// Whole-record overwrite keyed by `user.id`.
    async fn save_user(&self, user: &User) -> anyhow::Result<()>;

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    /// Case-insensitive email lookup; callers pass normalized emails but
    /// the backend must not rely on it.
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn list_users(&self, filter: &UserFilterParams) -> anyhow::Result<Vec<User>>;

    async fn insert_reset(&self, reset: &PasswordReset) -> anyhow::Result<()>;

    /// Exact token-string lookup, regardless of expiry or use; the token
    /// service decides what the record means.
    async fn find_reset_by_token(&self, token: &str) -> anyhow::Result<Option<PasswordReset>>;

    /// Stamps `used_at` on the record only if it is still unused, and
    /// reports whether this call won. Losing the race means another
    /// consumer already spent the token.
    async fn mark_reset_used(&self, id: Uuid, used_at: DateTime<Utc>) -> anyhow::Result<bool>;

    /// Marks every outstanding (unused) reset for the user as used,
    /// superseding it. Called before issuing a fresh token and after a
    /// successful activation.
    async fn invalidate_resets_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    /// Live (unused, unexpired) resets for a user. Feeds the staff
    /// listing's reset-token state; at most one entry by construction.
    async fn live_resets_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PasswordReset>>;
}
