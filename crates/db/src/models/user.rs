//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use quizdeck_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub pseudo: String,
    pub mail: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub pseudo: String,
    pub mail: String,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            pseudo: user.pseudo,
            mail: user.mail,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The hash comes from the credential value
/// object; plaintext never reaches this layer.
#[derive(Debug)]
pub struct CreateUser {
    pub pseudo: String,
    pub mail: String,
    pub password_hash: String,
}
