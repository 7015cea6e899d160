//! JWT access-token issuing, introspection, and validation.
//!
//! Access tokens are HS256-signed JWTs carrying the registered
//! `iss`/`aud`/`exp` claims plus caller claims verbatim, `jti` (the session
//! id) included. No random salt enters the signature: identical claims and
//! expiry produce byte-identical token text.

use std::collections::BTreeMap;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quizdeck_core::error::CoreError;
use quizdeck_core::types::Timestamp;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Caller-supplied claims, flattened into the payload.
    ///
    /// A `BTreeMap` keeps serialization order stable so token text is
    /// deterministic for a given claim set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Configuration for token signing and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Value of the `iss` claim.
    pub issuer: String,
    /// Value of the `aud` claim.
    pub audience: String,
    /// Access token lifetime in minutes (default: 30).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 30).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 30;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default           |
    /// |----------------------------|----------|-------------------|
    /// | `JWT_SECRET`               | **yes**  | --                |
    /// | `JWT_ISSUER`               | no       | `quizdeck`        |
    /// | `JWT_AUDIENCE`             | no       | `quizdeck-client` |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `30`              |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `30`              |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "quizdeck".into());
        let audience = std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "quizdeck-client".into());

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            issuer,
            audience,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

/// Issue a signed access token carrying `claims` verbatim.
pub fn issue_access_token(
    claims: &BTreeMap<String, Value>,
    expires_at: Timestamp,
    config: &JwtConfig,
) -> Result<String, CoreError> {
    let payload = Claims {
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        exp: expires_at.timestamp(),
        extra: claims.clone(),
    };

    encode(
        &Header::default(), // HS256
        &payload,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("Token signing failed: {e}")))
}

/// Parse a token's claims without verifying signature or expiry.
///
/// Introspection only: structurally invalid input fails with
/// [`CoreError::MalformedToken`], but a bad signature or elapsed expiry does
/// not. Use [`validate_token`] on any authentication path.
pub fn decode_claims(token: &str) -> Result<Claims, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| CoreError::MalformedToken(e.to_string()))
}

/// Validate signature, expiry, issuer, and audience, returning the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| CoreError::Unauthorized(format!("Invalid or expired token: {e}")))
}
