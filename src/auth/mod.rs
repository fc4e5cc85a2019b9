//! Credential checks and stateless sessions.
//!
//! Registration validates, hashes and inserts. Login looks the user up,
//! verifies the hash and signs a session token. Nothing about a session is
//! stored server side.

mod error;
mod identifier;
pub(crate) mod password;
mod service;
mod state;
pub(crate) mod token;

pub use error::AuthError;
pub use identifier::IdentifierKind;
pub use password::{DEFAULT_BCRYPT_COST, DEFAULT_MIN_PASSWORD_LENGTH};
pub use service::{AuthService, LoginSuccess};
pub use state::{AuthConfig, DEFAULT_SESSION_TTL_SECONDS, SESSION_COOKIE_NAME};
pub use token::{SessionClaims, SessionKeys, TokenError};
