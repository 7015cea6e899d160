//! Orchestrator-level tests for `TokenService`, driven against a real
//! database but below the HTTP layer.

mod common;

use chrono::Utc;
use sqlx::PgPool;

use quizdeck_api::auth::jwt::decode_claims;
use quizdeck_api::auth::service::TokenService;
use quizdeck_api::error::AppError;
use quizdeck_core::error::CoreError;
use quizdeck_core::principal::Principal;
use quizdeck_core::session::SessionState;
use quizdeck_db::models::user::CreateUser;
use quizdeck_db::repositories::{SessionRepo, UserRepo};

fn test_service(pool: PgPool) -> TokenService {
    TokenService::from_config(pool, &common::test_config()).expect("test auth config is valid")
}

async fn create_test_user(pool: &PgPool, pseudo: &str) -> quizdeck_db::models::user::User {
    UserRepo::create(
        pool,
        &CreateUser {
            pseudo: pseudo.to_string(),
            mail: format!("{pseudo}@test.com"),
            password_hash: "0".repeat(128),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// A guest has no id, so it cannot be issued a session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn guest_cannot_own_session(pool: PgPool) {
    let service = test_service(pool);

    let result = service
        .issue(&Principal::Guest, "Chrome", "127.0.0.1".parse().unwrap())
        .await;

    assert!(matches!(
        result,
        Err(AppError::Core(CoreError::Unauthorized(_)))
    ));
}

/// Issue produces an active session whose access token carries the session
/// id as `jti`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn issue_creates_active_session(pool: PgPool) {
    let user = create_test_user(&pool, "service_user").await;
    let service = test_service(pool);

    let principal = Principal::authenticated(user.id)
        .with_claim("sub", user.id.to_string())
        .with_claim("pseudo", user.pseudo.clone());
    let session = service
        .issue(&principal, "Chrome", "10.0.0.7".parse().unwrap())
        .await
        .expect("issuing should succeed");

    assert_eq!(session.state(Utc::now()), SessionState::Active);
    assert_eq!(session.user_id(), user.id);
    assert_eq!(session.ip_address().to_string(), "10.0.0.7");

    let claims = decode_claims(session.access_token().as_str()).unwrap();
    assert_eq!(claims.extra["jti"], session.id().to_string());
    assert_eq!(claims.extra["pseudo"], "service_user");
}

/// Two revokes racing on the same session: the one that loses the store's
/// compare-and-swap gets `AlreadyRevoked`, same as a plain double revoke.
#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_revoke_loses_compare_and_swap(pool: PgPool) {
    let user = create_test_user(&pool, "racer").await;
    let service = test_service(pool.clone());

    let principal = Principal::authenticated(user.id).with_claim("sub", user.id.to_string());
    let session = service
        .issue(&principal, "Chrome", "127.0.0.1".parse().unwrap())
        .await
        .unwrap();

    // Someone else revokes the row after our read; our copy still says
    // `is_revoked = false`.
    assert!(SessionRepo::revoke(&pool, session.id()).await.unwrap());

    let result = service.revoke(&session).await;
    assert!(matches!(
        result,
        Err(AppError::Core(CoreError::AlreadyRevoked { id })) if id == session.id()
    ));
}
