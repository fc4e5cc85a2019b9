//! Identifier normalization and shape checks.

use regex::Regex;
use std::{fmt, str::FromStr};

const MAX_USERNAME_CHARS: usize = 64;

/// What users log in with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentifierKind {
    #[default]
    Email,
    Username,
}

impl IdentifierKind {
    /// Emails are trimmed and lower-cased, usernames only trimmed.
    #[must_use]
    pub fn normalize(self, raw: &str) -> String {
        match self {
            Self::Email => raw.trim().to_lowercase(),
            Self::Username => raw.trim().to_string(),
        }
    }

    /// Shape check on an already normalized identifier.
    #[must_use]
    pub fn is_valid(self, normalized: &str) -> bool {
        match self {
            Self::Email => valid_email(normalized),
            Self::Username => {
                let chars = normalized.chars().count();
                (1..=MAX_USERNAME_CHARS).contains(&chars)
                    && !normalized.chars().any(char::is_whitespace)
            }
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "username" => Ok(Self::Username),
            other => Err(format!("invalid identifier kind: {other}")),
        }
    }
}

fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}
