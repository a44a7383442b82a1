use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    response::invalid_body,
    state::AuthState,
    types::{MessageResponse, RegisterRequest},
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = MessageResponse),
        (status = 400, description = "A field is missing or empty", body = MessageResponse),
        (status = 409, description = "A user with this login already exists", body = MessageResponse),
        (status = 500, description = "Credential store failure", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, payload))]
pub async fn register(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(&rejection),
    };

    match auth_state
        .service()
        .register(
            request.name.as_deref(),
            request.surname.as_deref(),
            request.login.as_deref(),
            request.password.as_deref(),
        )
        .await
    {
        Ok(_) => (
            StatusCode::CREATED,
            Json(MessageResponse::new("Registration successful")),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
