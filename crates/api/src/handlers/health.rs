//! Liveness handler.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Returns 200 with a small JSON body once the database answers a ping.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    quizdeck_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
