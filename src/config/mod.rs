//! Configuration modules for the classroom-manager API.
//!
//! Each submodule loads one concern from environment variables:
//!
//! - [`cors`]: allowed CORS origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP settings for the notifier
//! - [`jwt`]: session-token signing secret and validity window
//! - [`security`]: bcrypt cost factor
//!
//! [`jwt::JwtConfig::from_env`] is the only fallible loader: a missing
//! `APP_SECRET` aborts startup. Everything else falls back to safe
//! defaults.

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod security;
