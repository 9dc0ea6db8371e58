//! Password hashing and verification.
//!
//! Bcrypt with a configurable cost factor. Hashing is CPU-bound enough to
//! starve the request path at real cost factors, so both operations run on
//! the blocking pool.

use crate::utils::errors::AppError;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {e}")))
}

pub async fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let digest = digest.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &digest))
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Verification task failed: {e}")))?
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {e}")))
}
