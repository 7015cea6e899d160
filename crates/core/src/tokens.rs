//! Opaque refresh-token generation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;

/// Number of random bytes in a refresh token (256 bits of entropy).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random refresh token.
///
/// Returns the standard-base64 encoding of [`REFRESH_TOKEN_BYTES`] random
/// bytes. The value is opaque to clients and never parsed server-side; it is
/// only compared by exact value. Uniqueness is probabilistic, guaranteed by
/// entropy width rather than enforced here.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_decodes_to_expected_byte_count() {
        let token = generate_refresh_token();
        let bytes = BASE64.decode(&token).expect("token must be valid base64");
        assert_eq!(bytes.len(), REFRESH_TOKEN_BYTES);
    }

    #[test]
    fn consecutive_tokens_differ() {
        assert_ne!(generate_refresh_token(), generate_refresh_token());
    }
}
