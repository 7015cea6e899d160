//! Repository for the `user_sessions` table.
//!
//! The at-rest cipher is applied here, transparently: methods accept and
//! return sessions with plaintext token values and only the storage
//! representation is encrypted. Because the cipher is deterministic, the
//! encrypted refresh-token column doubles as an exact-match lookup key.

use sqlx::PgPool;

use quizdeck_core::cipher::TokenCipher;
use quizdeck_core::session::Session;
use quizdeck_core::types::DbId;
use quizdeck_core::values::Token;

use crate::error::DbError;
use crate::models::session::SessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, access_token, refresh_token, access_expires_at, \
                        refresh_expires_at, is_revoked, device_name, ip_address, \
                        created_at, updated_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the persisted entity.
    pub async fn create(
        pool: &PgPool,
        cipher: &TokenCipher,
        session: &Session,
    ) -> Result<Session, DbError> {
        let query = format!(
            "INSERT INTO user_sessions (id, user_id, access_token, refresh_token,
                 access_expires_at, refresh_expires_at, is_revoked, device_name, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(session.id())
            .bind(session.user_id())
            .bind(cipher.encrypt(session.access_token().as_str()))
            .bind(cipher.encrypt(session.refresh_token().as_str()))
            .bind(session.access_expires_at())
            .bind(session.refresh_expires_at())
            .bind(session.is_revoked())
            .bind(session.device_name())
            .bind(session.ip_address())
            .fetch_one(pool)
            .await?;
        Ok(row.into_session(cipher)?)
    }

    /// Find a session by its id.
    pub async fn find_by_id(
        pool: &PgPool,
        cipher: &TokenCipher,
        id: DbId,
    ) -> Result<Option<Session>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE id = $1");
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(|r| r.into_session(cipher)).transpose().map_err(Into::into)
    }

    /// Find a session by its plaintext refresh token.
    ///
    /// Encrypts the probe value and matches the ciphertext column exactly;
    /// this is what the deterministic cipher exists for.
    pub async fn find_by_refresh_token(
        pool: &PgPool,
        cipher: &TokenCipher,
        refresh_token: &Token,
    ) -> Result<Option<Session>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE refresh_token = $1");
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(cipher.encrypt(refresh_token.as_str()))
            .fetch_optional(pool)
            .await?;
        row.map(|r| r.into_session(cipher)).transpose().map_err(Into::into)
    }

    /// Revoke a single session. Returns `true` if the row was updated.
    ///
    /// The `is_revoked = false` predicate is the concurrency token: of two
    /// racing revokes, exactly one updates a row and the loser observes
    /// `false`, which callers surface as an already-revoked conflict.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_revoked = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke all active sessions for a user. Returns the count revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, DbError> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = TRUE, updated_at = NOW()
             WHERE user_id = $1 AND is_revoked = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a user's sessions, excluding revoked ones.
    ///
    /// Ordered newest-first with the id as tie-breaker so the order is
    /// stable for a given snapshot.
    pub async fn list_active_by_user(
        pool: &PgPool,
        cipher: &TokenCipher,
        user_id: DbId,
    ) -> Result<Vec<Session>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND is_revoked = FALSE
             ORDER BY created_at DESC, id"
        );
        let rows = sqlx::query_as::<_, SessionRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        rows.into_iter()
            .map(|r| r.into_session(cipher).map_err(Into::into))
            .collect()
    }

    /// List a user's sessions for one device, excluding revoked ones.
    ///
    /// The device name is matched case-insensitively.
    pub async fn list_active_by_user_and_device(
        pool: &PgPool,
        cipher: &TokenCipher,
        user_id: DbId,
        device_name: &str,
    ) -> Result<Vec<Session>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND is_revoked = FALSE
               AND LOWER(device_name) = LOWER($2)
             ORDER BY created_at DESC, id"
        );
        let rows = sqlx::query_as::<_, SessionRow>(&query)
            .bind(user_id)
            .bind(device_name)
            .fetch_all(pool)
            .await?;
        rows.into_iter()
            .map(|r| r.into_session(cipher).map_err(Into::into))
            .collect()
    }

    /// Delete refresh-expired or revoked sessions. Returns the count deleted.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, DbError> {
        let result = sqlx::query(
            "DELETE FROM user_sessions WHERE refresh_expires_at < NOW() OR is_revoked = TRUE",
        )
        .execute(pool)
        .await?;
        let deleted = result.rows_affected();
        if deleted > 0 {
            tracing::debug!(deleted, "purged expired or revoked sessions");
        }
        Ok(deleted)
    }
}
