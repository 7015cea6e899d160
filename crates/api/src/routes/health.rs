//! Liveness route, mounted outside the versioned API tree.

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
