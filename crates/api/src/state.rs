use std::sync::Arc;

use crate::auth::service::TokenService;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: quizdeck_db::DbPool,
    /// Server configuration (read-only after startup).
    pub config: Arc<ServerConfig>,
    /// Session orchestrator (issuer, opaque generator, cipher, store).
    pub tokens: Arc<TokenService>,
}
