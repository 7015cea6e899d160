//! Trimmed, validated string value objects.
//!
//! Each wrapper trims its input at construction and rejects values that fail
//! validation. Equality, hashing, and ordering go through the lowercase form,
//! so lookups and deduplication are case-insensitive by design.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Minimum length of a [`Pseudo`] in characters.
pub const PSEUDO_MIN_LENGTH: usize = 3;

/// Maximum length of a [`Pseudo`] in characters.
pub const PSEUDO_MAX_LENGTH: usize = 32;

fn mail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("mail regex is valid"))
}

/// An opaque token value (access or refresh token text).
///
/// Holds any non-blank string; the wrapped value is never interpreted here.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Token must not be blank".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A mail address.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Mail(String);

impl Mail {
    pub fn new(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Mail must not be blank".into()));
        }
        if !mail_regex().is_match(trimmed) {
            return Err(CoreError::Validation(format!(
                "Mail address is not valid: {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A user's display pseudonym.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Pseudo(String);

impl Pseudo {
    pub fn new(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Pseudo must not be blank".into()));
        }
        let length = trimmed.chars().count();
        if !(PSEUDO_MIN_LENGTH..=PSEUDO_MAX_LENGTH).contains(&length) {
            return Err(CoreError::Validation(format!(
                "Pseudo must be between {PSEUDO_MIN_LENGTH} and {PSEUDO_MAX_LENGTH} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! case_insensitive_value {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.to_lowercase() == other.0.to_lowercase()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.to_lowercase().hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

case_insensitive_value!(Token);
case_insensitive_value!(Mail);
case_insensitive_value!(Pseudo);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn token_rejects_blank_input() {
        assert!(Token::new("").is_err());
        assert!(Token::new("   ").is_err());
        assert!(Token::new("\t\n").is_err());
    }

    #[test]
    fn token_trims_surrounding_whitespace() {
        let token = Token::new("  abc123  ").unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn token_equality_ignores_case() {
        let a = Token::new("SomeTokenValue").unwrap();
        let b = Token::new("sometokenvalue").unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b), "hash lookup must also ignore case");
    }

    #[test]
    fn mail_accepts_plausible_addresses() {
        for addr in ["user@example.com", "a.b+c@sub.domain.org", "x@y.fr"] {
            assert!(Mail::new(addr).is_ok(), "{addr} should be accepted");
        }
    }

    #[test]
    fn mail_rejects_malformed_addresses() {
        for addr in ["", "plainstring", "no@dot", "two@@example.com", "spa ce@x.com"] {
            assert!(Mail::new(addr).is_err(), "{addr} should be rejected");
        }
    }

    #[test]
    fn mail_equality_ignores_case() {
        let a = Mail::new("User@Example.COM").unwrap();
        let b = Mail::new("user@example.com").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn pseudo_enforces_length_bounds() {
        assert!(Pseudo::new("ab").is_err());
        assert!(Pseudo::new("abc").is_ok());
        assert!(Pseudo::new(&"x".repeat(PSEUDO_MAX_LENGTH)).is_ok());
        assert!(Pseudo::new(&"x".repeat(PSEUDO_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn pseudo_equality_ignores_case() {
        assert_eq!(Pseudo::new("Alice").unwrap(), Pseudo::new("ALICE").unwrap());
    }
}
