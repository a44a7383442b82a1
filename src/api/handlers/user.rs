//! Session-gated profile of the signed-in user.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

use super::auth::{
    AuthState,
    cookies::{extract_session_handle, read_last_logged},
    types::{MessageResponse, ProfileResponse},
};
use crate::auth::AuthError;

#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Profile of the session's user", body = ProfileResponse),
        (status = 401, description = "Missing or invalid session", body = MessageResponse),
    ),
    tag = "user"
)]
#[instrument(skip(headers, auth_state))]
pub async fn current_user(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let Some(handle) = extract_session_handle(&headers) else {
        return AuthError::Unauthenticated.into_response();
    };

    match auth_state
        .service()
        .current_user(&handle, |login| read_last_logged(&headers, login))
        .await
    {
        Ok(profile) => (StatusCode::OK, Json(ProfileResponse::from(profile))).into_response(),
        Err(err) => err.into_response(),
    }
}
