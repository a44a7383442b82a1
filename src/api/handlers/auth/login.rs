use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, instrument};

use super::{
    cookies::{extract_session_handle, session_cookie},
    response::invalid_body,
    state::AuthState,
    types::{LoginRequest, LoginResponse, MessageResponse},
};
use crate::auth::AuthError;

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = MessageResponse),
        (status = 401, description = "Invalid login or password", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(headers, auth_state, payload))]
pub async fn login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(&rejection),
    };

    // A missing field can never match a stored credential.
    let (Some(login), Some(password)) = (request.login, request.password) else {
        return AuthError::InvalidCredentials.into_response();
    };

    let service = auth_state.service();
    let outcome = match service.login(&login, &password).await {
        Ok(outcome) => outcome,
        Err(err) => return err.into_response(),
    };

    // Signing in again replaces whatever session the client held before.
    if let Some(previous) = extract_session_handle(&headers) {
        service.discard(&previous).await;
    }

    let cookie = match session_cookie(auth_state.config(), &outcome.handle) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            service.discard(&outcome.handle).await;
            return AuthError::Internal(err.into()).into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);

    (
        StatusCode::OK,
        response_headers,
        Json(LoginResponse {
            message: "Logged in successfully".to_string(),
            user: outcome.identity.into(),
        }),
    )
        .into_response()
}
