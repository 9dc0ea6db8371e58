//! # Classroom Manager
//!
//! The account-lifecycle and access-control core of a role-based classroom
//! management REST API: users carry one of four roles (student, teacher,
//! supervisor, admin) and move through a pending → active → inactive
//! lifecycle driven by opaque single-use tokens and staff actions.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── config/           # env-driven configuration (JWT, bcrypt, SMTP, DB)
//! ├── middleware/       # bearer-token extractor and role gate
//! ├── modules/
//! │   ├── auth/        # login, activation, password reset flows
//! │   └── users/       # staff-gated account management
//! ├── store/           # CredentialStore trait + Postgres / in-memory backends
//! └── utils/           # errors, jwt, password hashing, opaque tokens, email
//! ```
//!
//! Each feature module follows a consistent structure: `controller.rs`
//! (HTTP handlers), `service.rs` (business logic), `model.rs` (domain types
//! and DTOs), `router.rs` (route wiring).
//!
//! ## Request flow
//!
//! Inbound request → [`middleware::auth::AuthUser`] authenticates the
//! session token → [`middleware::role`] checks the declared role set →
//! the service mutates the credential store → the notifier is informed
//! (best-effort except admin-initiated resets) → JSON response shaped
//! `{"status": "Success"|"Error", "msg": ...}`.
//!
//! ## Security notes
//!
//! - Passwords are bcrypt-hashed on the blocking pool; plaintext is never
//!   logged, persisted, or echoed back.
//! - The signing secret (`APP_SECRET`) is mandatory; startup aborts
//!   without it.
//! - Reset/activation tokens are 32 bytes of CSPRNG output, single-use,
//!   with at most one live token per user.
//! - `forgot-password` answers identically for registered and unregistered
//!   emails.

pub mod config;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod store;
pub mod utils;
pub mod validator;
