pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register          create account (public)
/// /auth/login             login (public)
/// /auth/refresh           refresh (public, refresh token in body)
/// /auth/logout            revoke all sessions (requires auth)
/// /auth/sessions          list active sessions (requires auth)
/// /auth/sessions/{id}     revoke one session (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
