//! Credential policy validation and one-way hashing.
//!
//! A [`Password`] retains only the SHA-512 hex digest of its plaintext; the
//! plaintext is discarded at construction. Equality and hashing are over the
//! digest.

use std::hash::{Hash, Hasher};

use crate::error::CoreError;
use crate::hashing::sha512_hex;

/// Absolute minimum plaintext length in characters, checked before the
/// composite policy.
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// Minimum plaintext length required by the composite policy.
pub const POLICY_MIN_LENGTH: usize = 8;

/// The fixed set of symbols accepted by the composite policy.
pub const ALLOWED_SYMBOLS: &str = "!@#$%^&*()-_+=[]{}|:;,.<>?";

/// A one-way hashed credential.
#[derive(Debug, Clone)]
pub struct Password {
    hash: String,
}

impl Password {
    /// Validate `plaintext` against the credential policy and hash it.
    ///
    /// Fails with [`CoreError::Validation`] when the plaintext is blank,
    /// shorter than [`MIN_PASSWORD_LENGTH`], or misses any composite policy
    /// requirement: at least one lowercase letter, one uppercase letter, one
    /// digit, one symbol from [`ALLOWED_SYMBOLS`], and a total length of
    /// [`POLICY_MIN_LENGTH`].
    pub fn new(plaintext: &str) -> Result<Self, CoreError> {
        if plaintext.trim().is_empty() {
            return Err(CoreError::Validation("Password must not be blank".into()));
        }
        if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CoreError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        check_policy(plaintext)?;
        Ok(Self::from_plain_text(plaintext))
    }

    /// Hash `plaintext` without policy validation.
    ///
    /// For controlled internal use only, such as recomputing a digest to
    /// compare against a stored hash at login. Never use this to create a
    /// credential from raw user input; that path is [`Password::new`].
    pub fn from_plain_text(plaintext: &str) -> Self {
        Self {
            hash: sha512_hex(plaintext.as_bytes()),
        }
    }

    /// The hex-encoded SHA-512 digest.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Compare this credential's digest against a stored digest.
    pub fn matches_hash(&self, stored: &str) -> bool {
        self.hash == stored
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

impl Hash for Password {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

fn check_policy(plaintext: &str) -> Result<(), CoreError> {
    if plaintext.chars().count() < POLICY_MIN_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {POLICY_MIN_LENGTH} characters long"
        )));
    }
    if !plaintext.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(CoreError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !plaintext.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !plaintext.chars().any(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "Password must contain at least one digit".into(),
        ));
    }
    if !plaintext.chars().any(|c| ALLOWED_SYMBOLS.contains(c)) {
        return Err(CoreError::Validation(format!(
            "Password must contain at least one symbol from: {ALLOWED_SYMBOLS}"
        )));
    }
    Ok(())
}
