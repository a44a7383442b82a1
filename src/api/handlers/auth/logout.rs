use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, instrument};

use super::{
    cookies::{clear_session_cookie, extract_session_handle, last_logged_cookie},
    state::AuthState,
    types::MessageResponse,
};
use crate::auth::AuthError;

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out; marker cookie set and session cookie cleared", body = MessageResponse),
        (status = 400, description = "No active session", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(headers, auth_state))]
pub async fn logout(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let Some(handle) = extract_session_handle(&headers) else {
        return AuthError::NoSession.into_response();
    };

    let marker = match auth_state.service().logout(&handle).await {
        Ok(marker) => marker,
        Err(err) => return err.into_response(),
    };

    let config = auth_state.config();
    let mut response_headers = HeaderMap::new();
    // The session is already gone; a cookie we cannot encode is only logged.
    match last_logged_cookie(config, &marker) {
        Ok(cookie) => {
            response_headers.append(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build lastLogged cookie: {err:#}"),
    }
    match clear_session_cookie(config) {
        Ok(cookie) => {
            response_headers.append(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session clear cookie: {err}"),
    }

    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse::new("Logged out successfully")),
    )
        .into_response()
}
