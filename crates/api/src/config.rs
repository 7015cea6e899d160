use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Read once at startup and immutable afterwards; signing and cipher key
/// material is never rotated at runtime.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, issuer, audience, expiry durations).
    pub jwt: JwtConfig,
    /// Base64-encoded 32-byte key for the at-rest token cipher.
    pub cipher_key: String,
    /// Base64-encoded 16-byte IV for the at-rest token cipher.
    pub cipher_iv: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Required | Default                 |
    /// |------------------------|----------|-------------------------|
    /// | `HOST`                 | no       | `0.0.0.0`               |
    /// | `PORT`                 | no       | `3000`                  |
    /// | `CORS_ORIGINS`         | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`                    |
    /// | `TOKEN_CIPHER_KEY`     | **yes**  | --                      |
    /// | `TOKEN_CIPHER_IV`      | **yes**  | --                      |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or a value fails to parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let cipher_key = std::env::var("TOKEN_CIPHER_KEY")
            .expect("TOKEN_CIPHER_KEY must be set in the environment");
        let cipher_iv = std::env::var("TOKEN_CIPHER_IV")
            .expect("TOKEN_CIPHER_IV must be set in the environment");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            cipher_key,
            cipher_iv,
        }
    }
}
