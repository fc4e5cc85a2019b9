use crate::{api::handlers::types::MessageResponse, auth::AuthService, store::UserSummary};
use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Unauthenticated user listing for development. Only mounted when enabled.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Registered users, newest first", body = [UserSummary]),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    tag = "debug"
)]
pub async fn list_users(auth: Extension<Arc<AuthService>>) -> Response {
    match auth.list_users().await {
        Ok(users) => Json(users).into_response(),
        Err(err) => err.into_response(),
    }
}
