use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session {id} is already revoked")]
    AlreadyRevoked { id: DbId },

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
