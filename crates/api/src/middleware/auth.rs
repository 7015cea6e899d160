//! JWT-based authentication extractor for Axum handlers.

use std::collections::BTreeMap;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde_json::Value;
use uuid::Uuid;

use quizdeck_core::error::CoreError;
use quizdeck_core::principal::Principal;
use quizdeck_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from the token's `sub` claim).
    pub user_id: DbId,
    /// All caller claims carried by the token, `jti` included.
    pub claims: BTreeMap<String, Value>,
}

impl AuthUser {
    /// The session id carried in the token's `jti` claim, when present.
    pub fn session_id(&self) -> Option<DbId> {
        self.claims
            .get("jti")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    /// The identity this token represents, minus the `jti` claim (a
    /// replacement session mints its own).
    pub fn principal(&self) -> Principal {
        let mut claims = self.claims.clone();
        claims.remove("jti");
        Principal::Authenticated {
            id: self.user_id,
            claims,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;

        let user_id = claims
            .extra
            .get("sub")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Token is missing a subject claim".into(),
                ))
            })?;

        Ok(AuthUser {
            user_id,
            claims: claims.extra,
        })
    }
}
