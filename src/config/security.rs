use std::env;

/// Mirrors `bcrypt::MIN_COST`, which the bcrypt crate does not export.
const MIN_COST: u32 = 4;

#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Bcrypt cost factor. Sourced from `SALT_ROUNDS`, defaulting to the
    /// crate's safe default and clamped to the bcrypt minimum.
    pub bcrypt_cost: u32,
}

impl SecurityConfig {
    pub fn from_env() -> Self {
        let bcrypt_cost = env::var("SALT_ROUNDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(bcrypt::DEFAULT_COST)
            .max(MIN_COST);

        Self { bcrypt_cost }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}
