use anyhow::Context;
use std::env;

/// Session tokens are valid for 24 hours from issuance. The window is a
/// fixed product decision, not a tunable.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Issuer claim stamped into every session token.
pub const TOKEN_ISSUER: &str = "classroom-manager";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub session_ttl_secs: i64,
}

impl JwtConfig {
    /// Loads the signing secret from `APP_SECRET`.
    ///
    /// A missing secret is a fatal configuration error: the process must
    /// refuse to start rather than sign tokens with a guessable default.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = env::var("APP_SECRET")
            .context("APP_SECRET must be set; refusing to start without a signing secret")?;

        Ok(Self {
            secret,
            session_ttl_secs: SESSION_TTL_SECS,
        })
    }
}
