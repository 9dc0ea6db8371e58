//! Shared utilities.
//!
//! - [`email`]: notifier trait, SMTP implementation, notify policy
//! - [`errors`]: application error type and response mapping
//! - [`jwt`]: session-token creation and verification
//! - [`password`]: bcrypt hashing on the blocking pool
//! - [`token`]: opaque single-use reset/activation tokens

pub mod email;
pub mod errors;
pub mod jwt;
pub mod password;
pub mod token;
