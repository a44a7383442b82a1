use secrecy::SecretString;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, macros::format_description};
use tracing::{debug, error, info, instrument};

use super::{
    credentials::{Credential, CredentialStore, Identity, InsertOutcome},
    error::AuthError,
    session::{SessionHandle, SessionStore},
    utils::is_empty,
};

/// Result of a successful login: the new session and who it belongs to.
#[derive(Debug)]
pub struct LoginOutcome {
    pub handle: SessionHandle,
    pub identity: Identity,
}

/// Most recent logout for a login, persisted by the caller (client-side).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoutMarker {
    pub login: String,
    pub logged_out_at: OffsetDateTime,
}

impl LogoutMarker {
    /// The marker time as an ISO-8601 string with millisecond precision.
    ///
    /// # Errors
    /// Returns an error if the time cannot be formatted.
    pub fn timestamp(&self) -> Result<String, time::error::Format> {
        self.logged_out_at
            .to_offset(UtcOffset::UTC)
            .format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
            ))
    }
}

/// What the current session may see about its own user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub last_logged: Option<String>,
}

/// Orchestrates registration, login and logout over the two stores.
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    sessions: SessionStore,
}

impl AuthService {
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>, sessions: SessionStore) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Register a new user.
    ///
    /// # Errors
    /// `Validation` when any field is missing or empty, `Conflict` when the
    /// login is taken, `Internal` when the credential store fails.
    #[instrument(skip(self, name, surname, password))]
    pub async fn register(
        &self,
        name: Option<&str>,
        surname: Option<&str>,
        login: Option<&str>,
        password: Option<&str>,
    ) -> Result<Identity, AuthError> {
        let (Some(name), Some(surname), Some(login), Some(password)) =
            (name, surname, login, password)
        else {
            return Err(AuthError::Validation);
        };
        if [name, surname, login, password]
            .into_iter()
            .any(|field| is_empty(Some(field)))
        {
            return Err(AuthError::Validation);
        }

        let credential = Credential::new(
            login.to_string(),
            SecretString::from(password.to_string()),
            name.to_string(),
            surname.to_string(),
        );
        let identity = credential.identity();

        match self.credentials.insert(credential).await {
            Ok(InsertOutcome::Created) => {
                info!("user registered");
                Ok(identity)
            }
            Ok(InsertOutcome::AlreadyExists) => {
                debug!("login already registered");
                Err(AuthError::Conflict)
            }
            Err(err) => {
                error!("Failed to insert credential: {err:#}");
                Err(AuthError::Internal(err))
            }
        }
    }

    /// Check a login/password pair and open a session for it.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown login or a wrong password (the two
    /// are indistinguishable), `Internal` when a store fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let credential = match self.credentials.find_by_login(login).await {
            Ok(credential) => credential,
            Err(err) => {
                error!("Failed to look up credential: {err:#}");
                return Err(AuthError::Internal(err));
            }
        };

        let Some(credential) = credential.filter(|c| c.password_matches(password)) else {
            debug!("login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let identity = credential.identity();
        let handle = self
            .sessions
            .create(identity.clone())
            .await
            .inspect_err(|err| error!("Failed to create session: {err:#}"))?;

        info!("login succeeded");
        Ok(LoginOutcome { handle, identity })
    }

    /// End the session behind `handle`.
    ///
    /// # Errors
    /// `NoSession` when the handle does not resolve to a live session.
    #[instrument(skip_all)]
    pub async fn logout(&self, handle: &SessionHandle) -> Result<LogoutMarker, AuthError> {
        let identity = self
            .sessions
            .destroy(handle)
            .await
            .ok_or(AuthError::NoSession)?;

        info!(login = %identity.login, "logged out");
        Ok(LogoutMarker {
            login: identity.login,
            logged_out_at: OffsetDateTime::now_utc(),
        })
    }

    /// Resolve `handle` for a session-gated resource.
    ///
    /// # Errors
    /// `Unauthenticated` when the handle does not resolve to a live session.
    pub async fn authenticate(&self, handle: &SessionHandle) -> Result<Identity, AuthError> {
        self.sessions
            .resolve(handle)
            .await
            .ok_or(AuthError::Unauthenticated)
    }

    /// Profile of the session's user, with the last logout time looked up by
    /// login through `last_logout`.
    ///
    /// # Errors
    /// `Unauthenticated` when the handle does not resolve to a live session.
    pub async fn current_user<F>(
        &self,
        handle: &SessionHandle,
        last_logout: F,
    ) -> Result<Profile, AuthError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let identity = self.authenticate(handle).await?;
        let last_logged = last_logout(&identity.login);
        Ok(Profile {
            first_name: identity.first_name,
            last_name: identity.last_name,
            last_logged,
        })
    }

    /// Drop a session without reporting whether it existed.
    pub async fn discard(&self, handle: &SessionHandle) {
        if self.sessions.destroy(handle).await.is_some() {
            debug!("discarded previous session");
        }
    }
}
