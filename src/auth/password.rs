//! Password policy and `bcrypt` hashing.
//!
//! Hashing and verification are CPU bound, so both run on the blocking thread
//! pool instead of stalling the runtime.

use anyhow::{Context, Result};

use super::error::AuthError;

pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// `bcrypt` ignores everything past 72 bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Length policy, counted in characters.
///
/// # Errors
/// Returns `WeakPassword` with the reason.
pub fn check_policy(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {min_length} characters"
        )));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }

    Ok(())
}

/// Salted hash with the given cost.
///
/// # Errors
/// Returns an error if `bcrypt` fails or the blocking task panics.
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

/// Constant-time comparison happens inside `bcrypt::verify`.
///
/// # Errors
/// Returns an error if the stored hash is malformed or the task panics.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("failed to verify password")
}
