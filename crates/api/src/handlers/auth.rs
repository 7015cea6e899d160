//! Handlers for the `/auth` resource (register, login, refresh, logout,
//! session management).

use std::net::{IpAddr, Ipv4Addr};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use quizdeck_core::error::CoreError;
use quizdeck_core::password::Password;
use quizdeck_core::principal::Principal;
use quizdeck_core::session::Session;
use quizdeck_core::types::{DbId, Timestamp};
use quizdeck_core::values::{Mail, Pseudo, Token};
use quizdeck_db::models::user::{CreateUser, User, UserResponse};
use quizdeck_db::repositories::{SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub pseudo: String,
    pub mail: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub pseudo: String,
    pub password: String,
    /// Free-text label for the client device ("Chrome", "iPhone", ...).
    pub device_name: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Id of the session backing these tokens.
    pub session_id: DbId,
    pub user: UserResponse,
}

/// One active session in `GET /auth/sessions` output.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: DbId,
    pub device_name: String,
    pub ip_address: String,
    pub access_expires_at: Timestamp,
    pub refresh_expires_at: Timestamp,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id(),
            device_name: session.device_name().to_string(),
            ip_address: session.ip_address().to_string(),
            access_expires_at: session.access_expires_at(),
            refresh_expires_at: session.refresh_expires_at(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a user account. Pseudo, mail, and password all go through the
/// domain value objects, so policy violations come back as 400s.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let pseudo = Pseudo::new(&input.pseudo)?;
    let mail = Mail::new(&input.mail)?;
    let password = Password::new(&input.password)?;

    // Value equality is case-insensitive, so the lookups are too.
    if UserRepo::find_by_pseudo(&state.pool, pseudo.as_str())
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Pseudo is already taken".into(),
        )));
    }
    if UserRepo::find_by_mail(&state.pool, mail.as_str())
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Mail address is already registered".into(),
        )));
    }

    let input = CreateUser {
        pseudo: pseudo.as_str().to_string(),
        mail: mail.as_str().to_string(),
        password_hash: password.hash().to_string(),
    };
    let user = UserRepo::create(&state.pool, &input).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/v1/auth/login
///
/// Authenticate with pseudo + password. Issues a new per-device session and
/// returns its access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find the user (pseudo comparison ignores case).
    let user = UserRepo::find_by_pseudo(&state.pool, &input.pseudo)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid pseudo or password".into()))
        })?;

    // 2. Verify the password against the stored digest.
    let provided = Password::from_plain_text(&input.password);
    if !provided.matches_hash(&user.password_hash) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid pseudo or password".into(),
        )));
    }

    // 3. Issue and persist a session for this device.
    let principal = Principal::authenticated(user.id)
        .with_claim("sub", user.id.to_string())
        .with_claim("pseudo", user.pseudo.clone());
    let session = state
        .tokens
        .issue(&principal, &input.device_name, client_ip(&headers))
        .await?;

    Ok(Json(auth_response(&state, session, user)))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a brand-new session (the old one is
/// revoked). Expired or revoked refresh tokens come back as 401.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let refresh_token = Token::new(&input.refresh_token)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into())))?;

    let session = state
        .tokens
        .refresh(&refresh_token, client_ip(&headers))
        .await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(auth_response(&state, session, user)))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/sessions
///
/// List the authenticated user's active (non-revoked) sessions.
pub async fn list_sessions(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<SessionResponse>>> {
    let sessions =
        SessionRepo::list_active_by_user(&state.pool, state.tokens.cipher(), auth_user.user_id)
            .await?;
    Ok(Json(sessions.iter().map(SessionResponse::from).collect()))
}

/// DELETE /api/v1/auth/sessions/{id}
///
/// Revoke one of the authenticated user's sessions. Revoking a session that
/// is already revoked is a conflict, not a no-op.
pub async fn revoke_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let session = SessionRepo::find_by_id(&state.pool, state.tokens.cipher(), id)
        .await?
        .filter(|s| s.user_id() == auth_user.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))?;

    state.tokens.revoke(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Client address recorded in session metadata: first `X-Forwarded-For` hop,
/// falling back to loopback for direct connections and tests.
fn client_ip(headers: &HeaderMap) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Build the response body shared by login and refresh.
fn auth_response(state: &AppState, session: Session, user: User) -> AuthResponse {
    AuthResponse {
        access_token: session.access_token().as_str().to_string(),
        refresh_token: session.refresh_token().as_str().to_string(),
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        session_id: session.id(),
        user: user.into(),
    }
}
