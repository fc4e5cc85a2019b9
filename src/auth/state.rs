//! Auth configuration.

use super::{
    identifier::IdentifierKind,
    password::{DEFAULT_BCRYPT_COST, DEFAULT_MIN_PASSWORD_LENGTH},
};

pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
pub const SESSION_COOKIE_NAME: &str = "sid";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    identifier_kind: IdentifierKind,
    min_password_length: usize,
    bcrypt_cost: u32,
    session_ttl_seconds: i64,
    session_cookie_secure: bool,
    login_redirect: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            identifier_kind: IdentifierKind::default(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            session_cookie_secure: false,
            login_redirect: None,
        }
    }

    #[must_use]
    pub fn with_identifier_kind(mut self, kind: IdentifierKind) -> Self {
        self.identifier_kind = kind;
        self
    }

    #[must_use]
    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_login_redirect(mut self, redirect: Option<String>) -> Self {
        self.login_redirect = redirect;
        self
    }

    #[must_use]
    pub fn identifier_kind(&self) -> IdentifierKind {
        self.identifier_kind
    }

    #[must_use]
    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    #[must_use]
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Only true when the service is reached over HTTPS.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }

    #[must_use]
    pub fn login_redirect(&self) -> Option<&str> {
        self.login_redirect.as_deref()
    }
}
