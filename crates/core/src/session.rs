//! The authentication session entity and its state machine.
//!
//! A session pairs a signed access token and an opaque refresh token with one
//! user/device. It is created once per login or refresh, mutated only to flip
//! the revocation flag, and never has its expiry extended; renewal always
//! mints a brand-new session.

use std::net::IpAddr;

use chrono::Utc;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::values::Token;

/// Lifecycle state derived from the revocation flag and the expiry windows.
///
/// ```text
/// Active -> AccessExpired -> RefreshExpired
///    \          \                (terminal by time)
///     \          \
///      +----------+-----> Revoked   (terminal, irreversible)
/// ```
///
/// There is no transition back to `Active`; renewal issues a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not revoked, access window still open.
    Active,
    /// Not revoked, access window elapsed, refresh window still open.
    AccessExpired,
    /// Refresh window elapsed.
    RefreshExpired,
    /// Explicitly revoked, regardless of expiry.
    Revoked,
}

/// Input for creating a brand-new session.
pub struct NewSession {
    pub id: DbId,
    pub user_id: DbId,
    pub access_token: Token,
    pub refresh_token: Token,
    pub access_expires_at: Timestamp,
    pub refresh_expires_at: Timestamp,
    pub device_name: String,
    pub ip_address: IpAddr,
}

/// A persisted authentication session.
///
/// Fields are private: invariants are enforced at construction and the only
/// permitted mutation is [`Session::revoke`].
#[derive(Debug, Clone)]
pub struct Session {
    id: DbId,
    user_id: DbId,
    access_token: Token,
    refresh_token: Token,
    access_expires_at: Timestamp,
    refresh_expires_at: Timestamp,
    is_revoked: bool,
    device_name: String,
    ip_address: IpAddr,
}

impl Session {
    /// Create a new, unrevoked session, enforcing construction invariants:
    ///
    /// - the owning user id is required (non-nil);
    /// - the device name is required (non-blank, stored trimmed);
    /// - both expiries are strictly in the future;
    /// - `access_expires_at <= refresh_expires_at`.
    pub fn new(input: NewSession) -> Result<Self, CoreError> {
        let now = Utc::now();
        if input.access_expires_at <= now || input.refresh_expires_at <= now {
            return Err(CoreError::Validation(
                "Session expiry must be in the future".into(),
            ));
        }
        let device_name = Self::validate_required(&input)?;
        Ok(Self {
            id: input.id,
            user_id: input.user_id,
            access_token: input.access_token,
            refresh_token: input.refresh_token,
            access_expires_at: input.access_expires_at,
            refresh_expires_at: input.refresh_expires_at,
            is_revoked: false,
            device_name,
            ip_address: input.ip_address,
        })
    }

    /// Reconstruct a session from persisted fields.
    ///
    /// Used by the storage layer when materializing rows. Skips the
    /// strictly-in-the-future expiry check -- stored sessions legitimately
    /// outlive their windows -- but keeps every other invariant.
    pub fn from_storage(input: NewSession, is_revoked: bool) -> Result<Self, CoreError> {
        let device_name = Self::validate_required(&input)?;
        Ok(Self {
            id: input.id,
            user_id: input.user_id,
            access_token: input.access_token,
            refresh_token: input.refresh_token,
            access_expires_at: input.access_expires_at,
            refresh_expires_at: input.refresh_expires_at,
            is_revoked,
            device_name,
            ip_address: input.ip_address,
        })
    }

    fn validate_required(input: &NewSession) -> Result<String, CoreError> {
        if input.user_id.is_nil() {
            return Err(CoreError::Validation("Session user is required".into()));
        }
        let device_name = input.device_name.trim();
        if device_name.is_empty() {
            return Err(CoreError::Validation(
                "Session device name is required".into(),
            ));
        }
        if input.access_expires_at > input.refresh_expires_at {
            return Err(CoreError::Validation(
                "Session access expiry must not be later than refresh expiry".into(),
            ));
        }
        Ok(device_name.to_string())
    }

    pub fn id(&self) -> DbId {
        self.id
    }

    pub fn user_id(&self) -> DbId {
        self.user_id
    }

    pub fn access_token(&self) -> &Token {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &Token {
        &self.refresh_token
    }

    pub fn access_expires_at(&self) -> Timestamp {
        self.access_expires_at
    }

    pub fn refresh_expires_at(&self) -> Timestamp {
        self.refresh_expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.is_revoked
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn ip_address(&self) -> IpAddr {
        self.ip_address
    }

    /// Mark the session revoked.
    ///
    /// Revoking an already-revoked session is an error, not a no-op: callers
    /// may depend on detecting double-revocation attempts.
    pub fn revoke(&mut self) -> Result<(), CoreError> {
        if self.is_revoked {
            return Err(CoreError::AlreadyRevoked { id: self.id });
        }
        self.is_revoked = true;
        Ok(())
    }

    /// Whether the access window has elapsed at `now`.
    ///
    /// End-exclusive: a session whose `access_expires_at` equals `now`
    /// exactly is already expired.
    pub fn is_access_expired(&self, now: Timestamp) -> bool {
        self.access_expires_at <= now
    }

    /// Whether the refresh window has elapsed at `now` (end-exclusive).
    pub fn is_refresh_expired(&self, now: Timestamp) -> bool {
        self.refresh_expires_at <= now
    }

    /// Derive the lifecycle state at `now`.
    pub fn state(&self, now: Timestamp) -> SessionState {
        if self.is_revoked {
            SessionState::Revoked
        } else if self.is_refresh_expired(now) {
            SessionState::RefreshExpired
        } else if self.is_access_expired(now) {
            SessionState::AccessExpired
        } else {
            SessionState::Active
        }
    }
}
