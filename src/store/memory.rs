//! In-memory credential store for tests.
//!
//! Implements the same contract as the Postgres backend over
//! `tokio::sync::RwLock` maps. Available behind the `test-utils` feature.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::auth::model::PasswordReset;
use crate::modules::users::model::{User, UserFilterParams};

use super::CredentialStore;

#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<Uuid, User>>,
    resets: RwLock<Vec<PasswordReset>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reset records ever issued, for asserting on ordering and
    /// supersession in tests.
    pub async fn all_resets(&self) -> Vec<PasswordReset> {
        self.resets.read().await.clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert_user(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            anyhow::bail!("duplicate user id: {}", user.id);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn save_user(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            anyhow::bail!("no such user: {}", user.id);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let needle = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned())
    }

    async fn list_users(&self, filter: &UserFilterParams) -> anyhow::Result<Vec<User>> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| filter.status.is_none_or(|s| u.account_status == s))
            .filter(|u| {
                search.as_ref().is_none_or(|s| {
                    u.name.to_lowercase().contains(s) || u.email.to_lowercase().contains(s)
                })
            })
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn insert_reset(&self, reset: &PasswordReset) -> anyhow::Result<()> {
        self.resets.write().await.push(reset.clone());
        Ok(())
    }

    async fn find_reset_by_token(&self, token: &str) -> anyhow::Result<Option<PasswordReset>> {
        Ok(self
            .resets
            .read()
            .await
            .iter()
            .find(|r| r.token == token)
            .cloned())
    }

    async fn mark_reset_used(&self, id: Uuid, used_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let mut resets = self.resets.write().await;
        match resets.iter_mut().find(|r| r.id == id) {
            Some(reset) if reset.used_at.is_none() => {
                reset.used_at = Some(used_at);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => anyhow::bail!("no such password reset: {id}"),
        }
    }

    async fn invalidate_resets_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut resets = self.resets.write().await;
        for reset in resets
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.used_at.is_none())
        {
            reset.used_at = Some(now);
        }
        Ok(())
    }

    async fn live_resets_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PasswordReset>> {
        Ok(self
            .resets
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && r.is_live(now))
            .cloned()
            .collect())
    }
}
