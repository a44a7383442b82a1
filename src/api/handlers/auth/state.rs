//! Auth state and configuration shared by the HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, CredentialStore, SessionStore};

const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;
const DEFAULT_FRONTEND_BASE_URL: &str = "http://localhost:4200";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    session_ttl_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FRONTEND_BASE_URL.to_string())
    }
}

pub struct AuthState {
    config: AuthConfig,
    service: AuthService,
}

impl AuthState {
    /// Build the state with a fresh session store sized to the configured TTL.
    #[must_use]
    pub fn new(config: AuthConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_seconds()));
        Self {
            config,
            service: AuthService::new(credentials, sessions),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn service(&self) -> &AuthService {
        &self.service
    }
}
