//! Session row model and its mapping to the domain entity.

use std::net::IpAddr;

use sqlx::FromRow;

use quizdeck_core::cipher::TokenCipher;
use quizdeck_core::error::CoreError;
use quizdeck_core::session::{NewSession, Session};
use quizdeck_core::types::{DbId, Timestamp};
use quizdeck_core::values::Token;

/// Raw session row from the `user_sessions` table.
///
/// `access_token` and `refresh_token` hold ciphertext; use
/// [`SessionRow::into_session`] to materialize a plaintext-token [`Session`].
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub user_id: DbId,
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: Timestamp,
    pub refresh_expires_at: Timestamp,
    pub is_revoked: bool,
    pub device_name: String,
    pub ip_address: IpAddr,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SessionRow {
    /// Decrypt the token columns and rebuild the domain entity.
    ///
    /// Fails with [`CoreError::Decryption`] on cipher/key mismatch or
    /// corrupted storage.
    pub fn into_session(self, cipher: &TokenCipher) -> Result<Session, CoreError> {
        let access_token = Token::new(&cipher.decrypt(&self.access_token)?)?;
        let refresh_token = Token::new(&cipher.decrypt(&self.refresh_token)?)?;
        Session::from_storage(
            NewSession {
                id: self.id,
                user_id: self.user_id,
                access_token,
                refresh_token,
                access_expires_at: self.access_expires_at,
                refresh_expires_at: self.refresh_expires_at,
                device_name: self.device_name,
                ip_address: self.ip_address,
            },
            self.is_revoked,
        )
    }
}
