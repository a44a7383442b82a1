//! Server-side session storage.
//!
//! Sessions are keyed by the SHA-256 of their token; the raw token only lives
//! in the caller's cookie. A single mutex guards the map, so `create`,
//! `resolve` and `destroy` on the same token never interleave.

use anyhow::Result;
use std::{
    collections::HashMap,
    fmt,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use super::{
    credentials::Identity,
    utils::{generate_session_token, hash_session_token},
};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Opaque reference to a live session, held by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionHandle(String);

impl SessionHandle {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionHandle").field(&"***").finish()
    }
}

struct SessionEntry {
    identity: Identity,
    created_at: Instant,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<[u8; 32], SessionEntry>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Bind a fresh, unguessable handle to `identity`.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub async fn create(&self, identity: Identity) -> Result<SessionHandle> {
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, entry| entry.created_at.elapsed() < self.ttl);

        let (token, key) = loop {
            let token = generate_session_token()?;
            let key = hash_session_token(&token);
            if !sessions.contains_key(&key) {
                break (token, key);
            }
        };

        sessions.insert(
            key,
            SessionEntry {
                identity,
                created_at: Instant::now(),
            },
        );
        Ok(SessionHandle(token))
    }

    /// Return the identity bound to `handle`, if the session is live.
    pub async fn resolve(&self, handle: &SessionHandle) -> Option<Identity> {
        let key = hash_session_token(handle.as_str());
        let mut sessions = self.sessions.lock().await;
        match sessions.get(&key) {
            Some(entry) if entry.created_at.elapsed() < self.ttl => Some(entry.identity.clone()),
            Some(_) => {
                sessions.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Remove the session behind `handle`.
    ///
    /// Idempotent: an unknown or expired handle yields `None`. The removed
    /// identity is returned so callers can act on it without a second lookup.
    pub async fn destroy(&self, handle: &SessionHandle) -> Option<Identity> {
        let key = hash_session_token(handle.as_str());
        let entry = self.sessions.lock().await.remove(&key)?;
        (entry.created_at.elapsed() < self.ttl).then_some(entry.identity)
    }

    /// Number of stored sessions, including expired ones not yet pruned.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}
