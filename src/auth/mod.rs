//! Credential and session lifecycle, independent of any transport.
//!
//! ## Flow
//!
//! 1. `register` inserts a credential if the login is free.
//! 2. `login` checks the password and binds a fresh session handle to the
//!    user's identity.
//! 3. Session-gated resources call `authenticate` (or `current_user`) with the
//!    handle the client presents.
//! 4. `logout` destroys the session and returns a marker the caller keeps on
//!    the client side; it is reported back as `lastLogged` on the next profile
//!    read.
//!
//! Both stores are owned values handed to [`AuthService`]; nothing here is
//! global.

mod credentials;
mod error;
mod file;
mod memory;
mod service;
mod session;
mod utils;

pub use credentials::{Credential, CredentialStore, Identity, InsertOutcome};
pub use error::AuthError;
pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use service::{AuthService, LoginOutcome, LogoutMarker, Profile};
pub use session::{DEFAULT_SESSION_TTL, SessionHandle, SessionStore};
