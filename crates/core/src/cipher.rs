//! Deterministic at-rest encryption for persisted token values.
//!
//! AES-256-CBC with PKCS7 padding under a static, configuration-supplied key
//! and IV. Because key and IV are fixed, identical plaintexts always produce
//! identical ciphertexts, which lets the session store look rows up by
//! encrypted token value. Randomizing this cipher breaks that lookup path.

use std::fmt;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::CoreError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Cipher key length in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Initialization vector length in bytes (one AES block).
pub const IV_LENGTH: usize = 16;

/// Symmetric cipher protecting token columns at rest.
#[derive(Clone)]
pub struct TokenCipher {
    key: [u8; KEY_LENGTH],
    iv: [u8; IV_LENGTH],
}

impl TokenCipher {
    /// Build a cipher from base64-encoded key and IV material.
    ///
    /// Fails with [`CoreError::Validation`] when either value is not valid
    /// base64 or decodes to the wrong length.
    pub fn from_base64(key_b64: &str, iv_b64: &str) -> Result<Self, CoreError> {
        let key_bytes = BASE64
            .decode(key_b64)
            .map_err(|e| CoreError::Validation(format!("Cipher key is not valid base64: {e}")))?;
        let key: [u8; KEY_LENGTH] = key_bytes
            .try_into()
            .map_err(|_| CoreError::Validation(format!("Cipher key must be {KEY_LENGTH} bytes")))?;

        let iv_bytes = BASE64
            .decode(iv_b64)
            .map_err(|e| CoreError::Validation(format!("Cipher IV is not valid base64: {e}")))?;
        let iv: [u8; IV_LENGTH] = iv_bytes
            .try_into()
            .map_err(|_| CoreError::Validation(format!("Cipher IV must be {IV_LENGTH} bytes")))?;

        Ok(Self { key, iv })
    }

    /// Encrypt a plaintext value to base64 ciphertext.
    ///
    /// Deterministic: equal plaintexts yield equal ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        BASE64.encode(ciphertext)
    }

    /// Decrypt a base64 ciphertext produced by [`TokenCipher::encrypt`].
    ///
    /// Fails with [`CoreError::Decryption`] when the input is not valid
    /// base64, not a whole number of cipher blocks, or when padding
    /// validation fails (wrong key/IV, or corrupted ciphertext).
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CoreError> {
        let bytes = BASE64
            .decode(ciphertext)
            .map_err(|e| CoreError::Decryption(format!("ciphertext is not valid base64: {e}")))?;

        let plaintext = Aes256CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
            .map_err(|_| {
                CoreError::Decryption("invalid ciphertext length or padding".into())
            })?;

        String::from_utf8(plaintext)
            .map_err(|_| CoreError::Decryption("decrypted value is not valid UTF-8".into()))
    }
}

impl fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("TokenCipher").finish_non_exhaustive()
    }
}
