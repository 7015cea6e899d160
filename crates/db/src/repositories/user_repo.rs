//! Repository for the `users` table.

use sqlx::PgPool;

use quizdeck_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, pseudo, mail, password_hash, created_at, updated_at";

/// Provides the user operations the auth subsystem needs.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (pseudo, mail, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.pseudo)
            .bind(&input.mail)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by pseudo (case-insensitive).
    pub async fn find_by_pseudo(pool: &PgPool, pseudo: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(pseudo) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(pseudo)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by mail address (case-insensitive).
    pub async fn find_by_mail(pool: &PgPool, mail: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(mail) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(mail)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. Owned sessions go with it (cascade).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
