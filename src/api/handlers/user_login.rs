use crate::{
    api::handlers::{
        session::session_cookie,
        types::{Credentials, LoginResponse, MessageResponse},
    },
    auth::{AuthError, AuthService},
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path = "/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Authenticated, session cookie set", body = LoginResponse),
        (status = 400, description = "Missing fields", body = MessageResponse),
        (status = 401, description = "Invalid identifier or password", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<Credentials>>,
) -> Response {
    let credentials = payload.map(|Json(body)| body).unwrap_or_default();

    debug!("credentials: {:?}", credentials);

    let success = match auth
        .login(
            credentials.identifier.as_deref(),
            credentials.password.as_deref(),
        )
        .await
    {
        Ok(success) => success,
        Err(err) => return err.into_response(),
    };

    let cookie = match session_cookie(auth.config(), &success.token) {
        Ok(cookie) => cookie,
        Err(err) => return AuthError::Internal(err.into()).into_response(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    let body = LoginResponse {
        message: "Authenticated".to_string(),
        redirect: auth.config().login_redirect().map(ToString::to_string),
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}
