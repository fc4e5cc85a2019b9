//! # Portero (registration, login and cookie sessions)
//!
//! `portero` is a small credential service. Users register with an identifier
//! (an email address or a username) and a password; the password is stored as
//! a salted `bcrypt` hash in a single `SQLite` table.
//!
//! ## Sessions
//!
//! A successful login issues an HS256-signed token carrying the user id and
//! identifier, delivered in the `sid` cookie (`HttpOnly`, `SameSite=Lax`,
//! `Secure` in production). Sessions are stateless: nothing is stored server
//! side, and logout only clears the cookie. A replayed token stays valid until
//! it expires.
//!
//! ## Enumeration
//!
//! Login never distinguishes an unknown identifier from a wrong password. Both
//! return `401` with the same body.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
