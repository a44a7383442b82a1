//! Credential records and the store contract they live behind.

use anyhow::Result;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// A registered user: login, secret and display profile.
///
/// Immutable once created. The password is compared byte-for-byte and is
/// never hashed.
#[derive(Clone, Debug)]
pub struct Credential {
    pub login: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
}

impl Credential {
    #[must_use]
    pub fn new(login: String, password: SecretString, first_name: String, last_name: String) -> Self {
        Self {
            login,
            password,
            first_name,
            last_name,
        }
    }

    /// True when `password` equals the stored secret byte-for-byte.
    #[must_use]
    pub fn password_matches(&self, password: &str) -> bool {
        self.password.expose_secret().as_bytes() == password.as_bytes()
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            login: self.login.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// The non-secret part of a credential, bound to a session on login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub login: String,
    pub first_name: String,
    pub last_name: String,
}

/// Outcome of an insert-if-absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    AlreadyExists,
}

/// Storage for credentials keyed by login.
///
/// `insert` must be atomic with respect to its existence check: two
/// concurrent inserts of the same login yield exactly one `Created`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a credential by its exact login.
    ///
    /// # Errors
    /// Returns an error if the backing storage is unavailable or corrupt.
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>>;

    /// Insert a credential unless its login is already taken.
    ///
    /// # Errors
    /// Returns an error if the backing storage is unavailable or corrupt.
    async fn insert(&self, credential: Credential) -> Result<InsertOutcome>;

    /// Short name used in health output.
    fn kind(&self) -> &'static str;

    /// Verify the store is usable.
    ///
    /// # Errors
    /// Returns an error describing why the store cannot serve requests.
    async fn check(&self) -> Result<()> {
        Ok(())
    }
}
