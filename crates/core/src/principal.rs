//! Request identities consumed by the session orchestrator.
//!
//! Sessions are only ever issued through the "has an id and claims"
//! capability. A guest has neither, so issuing for one fails upstream.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::DbId;

/// The identity behind a request.
#[derive(Debug, Clone)]
pub enum Principal {
    /// An anonymous caller. Cannot own a session.
    Guest,
    /// An authenticated user with claims destined for the access token.
    ///
    /// Claims are kept in a `BTreeMap` so they serialize in a stable order.
    Authenticated {
        id: DbId,
        claims: BTreeMap<String, Value>,
    },
}

impl Principal {
    /// An authenticated principal with no extra claims.
    pub fn authenticated(id: DbId) -> Self {
        Self::Authenticated {
            id,
            claims: BTreeMap::new(),
        }
    }

    /// Attach a claim. No-op on a guest.
    #[must_use]
    pub fn with_claim(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Self::Authenticated { claims, .. } = &mut self {
            claims.insert(name.to_string(), value.into());
        }
        self
    }

    /// The user id, if authenticated.
    pub fn id(&self) -> Option<DbId> {
        match self {
            Self::Guest => None,
            Self::Authenticated { id, .. } => Some(*id),
        }
    }

    /// The claims carried by this identity (empty for a guest).
    pub fn claims(&self) -> BTreeMap<String, Value> {
        match self {
            Self::Guest => BTreeMap::new(),
            Self::Authenticated { claims, .. } => claims.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn guest_has_no_id_and_no_claims() {
        let guest = Principal::Guest;
        assert!(guest.id().is_none());
        assert!(guest.claims().is_empty());
    }

    #[test]
    fn authenticated_carries_id_and_claims() {
        let id = Uuid::new_v4();
        let principal = Principal::authenticated(id).with_claim("pseudo", "alice");
        assert_eq!(principal.id(), Some(id));
        assert_eq!(principal.claims()["pseudo"], "alice");
    }

    #[test]
    fn with_claim_on_guest_is_a_no_op() {
        let guest = Principal::Guest.with_claim("pseudo", "alice");
        assert!(guest.claims().is_empty());
    }
}
