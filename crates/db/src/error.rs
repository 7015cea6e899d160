use quizdeck_core::error::CoreError;

/// Error type for repository operations that cross the cipher boundary.
///
/// Plain sqlx failures propagate unchanged; decryption and entity
/// reconstruction failures surface as [`CoreError`].
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}
