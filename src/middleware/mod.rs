//! Request-processing middleware.
//!
//! - [`auth`]: `AuthUser` extractor validating the bearer credential
//! - [`role`]: centralized role gate and ownership override
//!
//! The flow on every protected route: extract and verify the bearer token
//! (401 on failure), then check the declared role set (403 on failure),
//! then run the handler with the verified claims attached.

pub mod auth;
pub mod role;
