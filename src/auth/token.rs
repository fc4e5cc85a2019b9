//! Signed session tokens (HS256 JWT).
//!
//! Expiry is checked here against an explicit `now` instead of by the JWT
//! library, so callers and tests control the clock.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id.
    pub sub: i64,
    pub identifier: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionKeys {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a claim for `user_id` valid for `ttl_seconds` from `now`.
    ///
    /// # Errors
    /// Returns `Encode` if signing fails.
    pub fn issue(
        &self,
        user_id: i64,
        identifier: &str,
        now: i64,
        ttl_seconds: i64,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: user_id,
            identifier: identifier.to_string(),
            iat: now,
            exp: now.saturating_add(ttl_seconds),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    /// Check signature and expiry at `now`.
    ///
    /// # Errors
    /// `Invalid` for malformed or mis-signed tokens, `Expired` once `exp <= now`.
    pub fn verify(&self, token: &str, now: i64) -> Result<SessionClaims, TokenError> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Invalid)?
            .claims;

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("algorithm", &"HS256")
            .field("secret", &"***")
            .finish()
    }
}

pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const DAY: i64 = 24 * 60 * 60;
    const WEEK: i64 = 7 * DAY;
    const T: i64 = 1_700_000_000;

    #[test]
    fn issued_token_round_trips_claims() -> Result<()> {
        let keys = SessionKeys::new(b"test-secret");
        let token = keys.issue(1, "a@b.com", T, WEEK)?;
        let claims = keys.verify(&token, T + 1)?;
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.identifier, "a@b.com");
        assert_eq!(claims.iat, T);
        assert_eq!(claims.exp, T + WEEK);
        Ok(())
    }

    #[test]
    fn accepted_after_six_days_rejected_after_eight() -> Result<()> {
        let keys = SessionKeys::new(b"test-secret");
        let token = keys.issue(7, "a@b.com", T, WEEK)?;

        assert!(keys.verify(&token, T + 6 * DAY).is_ok());
        assert!(matches!(
            keys.verify(&token, T + 8 * DAY),
            Err(TokenError::Expired)
        ));
        // Expiry instant itself is already rejected.
        assert!(matches!(
            keys.verify(&token, T + WEEK),
            Err(TokenError::Expired)
        ));
        Ok(())
    }

    #[test]
    fn other_secret_is_rejected() -> Result<()> {
        let token = SessionKeys::new(b"secret-one").issue(1, "a@b.com", T, WEEK)?;
        let result = SessionKeys::new(b"secret-two").verify(&token, T);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
        Ok(())
    }

    #[test]
    fn tampered_payload_is_rejected() -> Result<()> {
        let keys = SessionKeys::new(b"test-secret");
        let token = keys.issue(1, "a@b.com", T, WEEK)?;
        let forged = keys.issue(2, "admin@b.com", T, WEEK)?;

        // Swap in the other token's payload, keep the original signature.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(
            keys.verify(&spliced, T),
            Err(TokenError::Invalid(_))
        ));
        Ok(())
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = SessionKeys::new(b"test-secret");
        assert!(matches!(
            keys.verify("not.a.jwt", T),
            Err(TokenError::Invalid(_))
        ));
        assert!(keys.verify("", T).is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let keys = SessionKeys::new(b"super-secret-value");
        assert!(!format!("{keys:?}").contains("super-secret-value"));
    }

    #[test]
    fn now_is_after_2023() {
        assert!(now_unix_seconds() > T);
    }
}
