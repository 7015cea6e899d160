//! Session orchestration: issue, refresh, revoke.
//!
//! [`TokenService`] composes the signed-token issuer, the opaque-token
//! generator, the at-rest cipher, and the session store into the observable
//! session lifecycle. Configuration is read-only after startup; the service
//! is shared across requests behind an `Arc` without locking.

use std::net::IpAddr;

use chrono::{Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use quizdeck_core::cipher::TokenCipher;
use quizdeck_core::error::CoreError;
use quizdeck_core::principal::Principal;
use quizdeck_core::session::{NewSession, Session};
use quizdeck_core::tokens::generate_refresh_token;
use quizdeck_core::values::Token;
use quizdeck_db::repositories::SessionRepo;
use quizdeck_db::DbPool;

use crate::auth::jwt::{decode_claims, issue_access_token, JwtConfig};
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Orchestrates the session lifecycle over the token components.
pub struct TokenService {
    pool: DbPool,
    jwt: JwtConfig,
    cipher: TokenCipher,
}

impl TokenService {
    /// Build the service from loaded configuration.
    ///
    /// Fails with [`CoreError::Validation`] when the cipher key material is
    /// malformed.
    pub fn from_config(pool: DbPool, config: &ServerConfig) -> Result<Self, CoreError> {
        let cipher = TokenCipher::from_base64(&config.cipher_key, &config.cipher_iv)?;
        Ok(Self {
            pool,
            jwt: config.jwt.clone(),
            cipher,
        })
    }

    /// The at-rest cipher, for callers that query the session store directly.
    pub fn cipher(&self) -> &TokenCipher {
        &self.cipher
    }

    /// Issue and persist a new session for `principal`.
    ///
    /// A fresh session id is minted and rides in the access token as the
    /// `jti` claim, joined to the principal's own claims. The access window
    /// is `access_token_expiry_mins`, the refresh window
    /// `refresh_token_expiry_days`. Fails only if validation of the
    /// assembled session or persistence fails; persistence is not retried.
    pub async fn issue(
        &self,
        principal: &Principal,
        device_name: &str,
        ip_address: IpAddr,
    ) -> AppResult<Session> {
        let user_id = principal.id().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "A guest cannot own a session".into(),
            ))
        })?;

        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let access_expires_at = now + Duration::minutes(self.jwt.access_token_expiry_mins);
        let refresh_expires_at = now + Duration::days(self.jwt.refresh_token_expiry_days);

        let mut claims = principal.claims();
        claims.insert("jti".to_string(), Value::String(session_id.to_string()));
        let access_token = issue_access_token(&claims, access_expires_at, &self.jwt)?;

        let session = Session::new(NewSession {
            id: session_id,
            user_id,
            access_token: Token::new(&access_token)?,
            refresh_token: Token::new(&generate_refresh_token())?,
            access_expires_at,
            refresh_expires_at,
            device_name: device_name.to_string(),
            ip_address,
        })?;

        let persisted = SessionRepo::create(&self.pool, &self.cipher, &session).await?;
        tracing::info!(
            session_id = %persisted.id(),
            user_id = %persisted.user_id(),
            device = persisted.device_name(),
            "issued session"
        );
        Ok(persisted)
    }

    /// Revoke `session`.
    ///
    /// Strict one-way transition: revoking an already-revoked session fails
    /// with [`CoreError::AlreadyRevoked`]. The store-side compare-and-swap
    /// resolves races between two revokes; the loser gets the same error and
    /// must not retry -- the session is revoked either way.
    pub async fn revoke(&self, session: &Session) -> AppResult<()> {
        if session.is_revoked() {
            return Err(AppError::Core(CoreError::AlreadyRevoked {
                id: session.id(),
            }));
        }
        let updated = SessionRepo::revoke(&self.pool, session.id()).await?;
        if !updated {
            // Revoked concurrently since our read.
            return Err(AppError::Core(CoreError::AlreadyRevoked {
                id: session.id(),
            }));
        }
        tracing::info!(session_id = %session.id(), "revoked session");
        Ok(())
    }

    /// Exchange a valid refresh token for a brand-new session.
    ///
    /// Rotation by replacement: the old session is revoked and a new one is
    /// minted carrying the old access token's caller claims (read via
    /// parse-only decode; the token's own expiry is irrelevant here) under a
    /// fresh id, fresh windows, and fresh token material. There is no
    /// in-place renewal.
    pub async fn refresh(&self, refresh_token: &Token, ip_address: IpAddr) -> AppResult<Session> {
        let session = SessionRepo::find_by_refresh_token(&self.pool, &self.cipher, refresh_token)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid or expired refresh token".into(),
                ))
            })?;

        if session.is_revoked() || session.is_refresh_expired(Utc::now()) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            )));
        }

        let mut claims = decode_claims(session.access_token().as_str())?.extra;
        claims.remove("jti"); // the replacement session gets its own

        self.revoke(&session).await?;

        let principal = Principal::Authenticated {
            id: session.user_id(),
            claims,
        };
        self.issue(&principal, session.device_name(), ip_address)
            .await
    }
}
