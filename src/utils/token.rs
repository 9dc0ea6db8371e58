//! Opaque reset/activation token service.
//!
//! Tokens are 32 bytes of CSPRNG output, hex-encoded, carrying no embedded
//! claims: validity is established purely by store lookup plus expiry
//! comparison. Issuing supersedes any outstanding token for the user, and
//! consumption stamps `used_at` before the caller applies the password
//! change, so a token can never succeed twice.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use uuid::Uuid;

use crate::modules::auth::model::PasswordReset;
use crate::store::CredentialStore;
use crate::utils::errors::AppError;

/// Activation tokens issued at account creation are valid for 24 hours.
pub fn activation_token_ttl() -> Duration {
    Duration::hours(24)
}

/// Reset tokens (forgot-password and admin-initiated) are valid for 1 hour.
pub fn reset_token_ttl() -> Duration {
    Duration::hours(1)
}

#[derive(Debug, thiserror::Error)]
pub enum ResetTokenError {
    #[error("token not found")]
    NotFound,
    #[error("token expired")]
    Expired,
    #[error("token already used")]
    AlreadyUsed,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<ResetTokenError> for AppError {
    fn from(err: ResetTokenError) -> Self {
        match err {
            ResetTokenError::NotFound
            | ResetTokenError::Expired
            | ResetTokenError::AlreadyUsed => AppError::validation("Invalid or expired token."),
            ResetTokenError::Store(e) => AppError::Internal(e),
        }
    }
}

/// Random 64-character hex string, 32 bytes of entropy.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issues a fresh token for `user_id`, invalidating any outstanding one
/// first so exactly one token is live per user at any instant.
pub async fn issue_reset_token(
    store: &dyn CredentialStore,
    user_id: Uuid,
    ttl: Duration,
) -> anyhow::Result<PasswordReset> {
    let now = Utc::now();
    store.invalidate_resets_for_user(user_id, now).await?;

    let reset = PasswordReset {
        id: Uuid::new_v4(),
        user_id,
        token: generate_reset_token(),
        expires_at: now + ttl,
        created_at: now,
        used_at: None,
    };
    store.insert_reset(&reset).await?;

    Ok(reset)
}

/// Single-use consumption: looks the token up, rejects used or expired
/// records, and stamps `used_at` before returning the record to the caller.
pub async fn consume_reset_token(
    store: &dyn CredentialStore,
    token: &str,
    now: DateTime<Utc>,
) -> Result<PasswordReset, ResetTokenError> {
    let mut reset = store
        .find_reset_by_token(token)
        .await?
        .ok_or(ResetTokenError::NotFound)?;

    if reset.is_used() {
        return Err(ResetTokenError::AlreadyUsed);
    }
    if reset.is_expired(now) {
        return Err(ResetTokenError::Expired);
    }

    // The conditional stamp is the real single-use guard: losing it means
    // a concurrent consumer spent the token between the read and here.
    if !store.mark_reset_used(reset.id, now).await? {
        return Err(ResetTokenError::AlreadyUsed);
    }
    reset.used_at = Some(now);

    Ok(reset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_tokens_are_hex_and_unique() {
        let tokens: HashSet<String> = (0..64).map(|_| generate_reset_token()).collect();
        assert_eq!(tokens.len(), 64);
        for token in &tokens {
            assert_eq!(token.len(), 64);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
