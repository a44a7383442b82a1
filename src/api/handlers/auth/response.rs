//! Maps auth failures onto HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::types::MessageResponse;
use crate::auth::AuthError;

pub(crate) const INVALID_BODY_MESSAGE: &str = "Invalid request body";

pub(crate) fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Validation | AuthError::NoSession => StatusCode::BAD_REQUEST,
        AuthError::Conflict => StatusCode::CONFLICT,
        AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
        AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Display never includes the source of an internal error.
        (status_for(&self), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

/// 400 for a body that is not the expected JSON document.
pub(crate) fn invalid_body(rejection: &JsonRejection) -> Response {
    debug!("Rejected request body: {rejection}");
    (
        StatusCode::BAD_REQUEST,
        Json(MessageResponse::new(INVALID_BODY_MESSAGE)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::to_bytes;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (AuthError::Validation, StatusCode::BAD_REQUEST),
            (AuthError::NoSession, StatusCode::BAD_REQUEST),
            (AuthError::Conflict, StatusCode::CONFLICT),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                AuthError::Internal(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{err:?}");
        }
    }

    #[tokio::test]
    async fn internal_error_body_is_generic() -> Result<()> {
        let response = AuthError::Internal(anyhow::anyhow!("users.json: disk full")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let message: MessageResponse = serde_json::from_slice(&body)?;
        assert_eq!(message.message, "Internal server error");
        Ok(())
    }
}
