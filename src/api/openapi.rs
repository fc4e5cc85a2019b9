#![allow(clippy::needless_for_each)]

use super::handlers::{health, session, types, user_login, user_register, users};
use crate::store::UserSummary;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        user_register::register,
        user_login::login,
        session::me,
        session::logout,
        users::list_users,
    ),
    components(schemas(
        health::Health,
        types::Credentials,
        types::MessageResponse,
        types::RegisterResponse,
        types::LoginResponse,
        types::MeResponse,
        UserSummary,
    )),
    tags(
        (name = "auth", description = "Registration, login and cookie sessions"),
        (name = "health", description = "Service health"),
        (name = "debug", description = "Development-only endpoints")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
