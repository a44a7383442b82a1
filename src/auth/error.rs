use thiserror::Error;

/// Failure modes of the sign-in lifecycle.
///
/// Every variant is terminal for the request. `InvalidCredentials` deliberately
/// does not say whether the login or the password was wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("All fields are required")]
    Validation,
    #[error("A user with this login already exists")]
    Conflict,
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("No active session")]
    NoSession,
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_hides_source_in_display() {
        let err = AuthError::from(anyhow::anyhow!("users.json: permission denied"));
        assert_eq!(err.to_string(), "Internal server error");
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn credential_errors_share_one_message() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid login or password"
        );
    }
}
