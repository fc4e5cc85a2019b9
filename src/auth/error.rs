use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every failure the auth flow surfaces to a client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing identifier or password")]
    MissingFields,
    #[error("Invalid identifier")]
    InvalidIdentifier,
    #[error("{0}")]
    WeakPassword(String),
    #[error("Identifier already registered")]
    IdentifierTaken,
    // Same message for unknown users and wrong passwords.
    #[error("Invalid identifier or password")]
    InvalidCredentials,
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidIdentifier | Self::WeakPassword(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::IdentifierTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            // Detail stays in the logs; the client only sees the generic message.
            error!("Internal error: {err:?}");
        }

        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}
