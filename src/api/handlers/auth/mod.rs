//! Auth handlers and supporting modules.
//!
//! The session handle travels in the `accesso_session` cookie (a bearer
//! `Authorization` header is accepted too). Logout leaves a client-visible
//! `lastLogged_<login>` cookie behind, which `/api/user` reports back as
//! `lastLogged`.

pub(crate) mod cookies;
pub mod login;
pub mod logout;
pub mod register;
mod response;
mod state;
pub(crate) mod types;

pub use state::{AuthConfig, AuthState};
