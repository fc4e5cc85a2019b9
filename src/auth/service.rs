//! Register, login and session checks, independent of HTTP.

use tracing::{debug, info, instrument};

use super::{
    error::AuthError,
    password::{check_policy, hash_password, verify_password},
    state::AuthConfig,
    token::{now_unix_seconds, SessionClaims, SessionKeys},
};
use crate::store::{StoreError, UserStore, UserSummary};

/// A successful login: the signed token plus who it was issued for.
#[derive(Debug)]
pub struct LoginSuccess {
    pub token: String,
    pub user_id: i64,
    pub identifier: String,
}

#[derive(Debug)]
pub struct AuthService {
    config: AuthConfig,
    keys: SessionKeys,
    store: UserStore,
}

impl AuthService {
    #[must_use]
    pub fn new(config: AuthConfig, keys: SessionKeys, store: UserStore) -> Self {
        Self {
            config,
            keys,
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Create a user and return the new id.
    ///
    /// # Errors
    /// `MissingFields`, `InvalidIdentifier`, `WeakPassword`, `IdentifierTaken`
    /// or `Internal`.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        identifier: Option<&str>,
        password: Option<&str>,
    ) -> Result<i64, AuthError> {
        let (identifier, password) = required(identifier, password)?;

        let kind = self.config.identifier_kind();
        let identifier = kind.normalize(identifier);
        if !kind.is_valid(&identifier) {
            return Err(AuthError::InvalidIdentifier);
        }

        check_policy(password, self.config.min_password_length())?;

        let password_hash = hash_password(password, self.config.bcrypt_cost()).await?;

        match self.store.create_user(&identifier, &password_hash).await {
            Ok(id) => {
                info!(user_id = id, "User registered");
                Ok(id)
            }
            Err(StoreError::DuplicateIdentifier) => {
                debug!("Identifier already registered");
                Err(AuthError::IdentifierTaken)
            }
            Err(err) => Err(AuthError::Internal(err.into())),
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    /// `MissingFields`, `InvalidCredentials` or `Internal`.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        identifier: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginSuccess, AuthError> {
        self.login_at(identifier, password, now_unix_seconds()).await
    }

    /// Same as [`Self::login`] with an explicit issue time.
    ///
    /// # Errors
    /// `MissingFields`, `InvalidCredentials` or `Internal`.
    pub async fn login_at(
        &self,
        identifier: Option<&str>,
        password: Option<&str>,
        now: i64,
    ) -> Result<LoginSuccess, AuthError> {
        let (identifier, password) = required(identifier, password)?;
        let identifier = self.config.identifier_kind().normalize(identifier);

        let user = match self.store.find_by_identifier(&identifier).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("Login for unknown identifier");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => return Err(AuthError::Internal(err.into())),
        };

        if !verify_password(password, &user.password_hash).await? {
            debug!(user_id = user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .keys
            .issue(
                user.id,
                &user.identifier,
                now,
                self.config.session_ttl_seconds(),
            )
            .map_err(|err| AuthError::Internal(err.into()))?;

        info!(user_id = user.id, "Login successful");

        Ok(LoginSuccess {
            token,
            user_id: user.id,
            identifier: user.identifier,
        })
    }

    /// Decode the session token presented by the client.
    ///
    /// # Errors
    /// `Unauthenticated` when the token is missing, invalid or expired.
    pub fn check_session(&self, token: Option<&str>) -> Result<SessionClaims, AuthError> {
        self.check_session_at(token, now_unix_seconds())
    }

    /// Same as [`Self::check_session`] at an explicit time.
    ///
    /// # Errors
    /// `Unauthenticated` when the token is missing, invalid or expired.
    pub fn check_session_at(
        &self,
        token: Option<&str>,
        now: i64,
    ) -> Result<SessionClaims, AuthError> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Unauthenticated)?;

        self.keys.verify(token, now).map_err(|err| {
            debug!("Rejected session token: {err}");
            AuthError::Unauthenticated
        })
    }

    /// Debug listing of registered users.
    ///
    /// # Errors
    /// `Internal` if the store fails.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError> {
        self.store
            .list_users()
            .await
            .map_err(|err| AuthError::Internal(err.into()))
    }
}

fn required<'a>(
    identifier: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str), AuthError> {
    match (identifier, password) {
        (Some(identifier), Some(password)) if !identifier.is_empty() && !password.is_empty() => {
            Ok((identifier, password))
        }
        _ => Err(AuthError::MissingFields),
    }
}
