use crate::{
    api::handlers::types::{Credentials, MessageResponse, RegisterResponse},
    auth::AuthService,
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path = "/register",
    request_body = Credentials,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Missing fields, invalid identifier or weak password", body = MessageResponse),
        (status = 409, description = "Identifier already registered", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<Credentials>>,
) -> Response {
    let credentials = payload.map(|Json(body)| body).unwrap_or_default();

    debug!("credentials: {:?}", credentials);

    match auth
        .register(
            credentials.identifier.as_deref(),
            credentials.password.as_deref(),
        )
        .await
    {
        Ok(id) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "User created".to_string(),
                id,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
