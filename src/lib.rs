//! # accesso
//!
//! Username and password sign-in with server-side sessions.
//!
//! A user registers with a login, a password and a display name. Logging in
//! binds an unguessable session handle to the user's identity; the handle
//! travels in an `HttpOnly` cookie and unlocks the session-gated profile at
//! `/api/user`. Logging out destroys the session and leaves a
//! `lastLogged_<login>` cookie with the logout time, which the profile reports
//! back on the next sign-in.
//!
//! ## Layout
//!
//! - [`auth`]: credential and session stores plus the service that drives
//!   register, login and logout. Transport-agnostic.
//! - [`api`]: the axum router, cookie handling and the `OpenAPI` document.
//! - [`cli`]: argument parsing, telemetry and server startup.
//!
//! ## Storage
//!
//! Credentials live in memory by default, or in a JSON users file when
//! `--users-file` is given. Sessions are always in memory and expire after
//! `--session-ttl-seconds`. Passwords are compared as stored, without hashing.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
