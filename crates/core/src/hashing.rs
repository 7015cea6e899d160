//! Shared SHA-512 hex digest utility.
//!
//! Used by the `password` module for credential digests.

use sha2::{Digest, Sha512};

/// Compute a SHA-512 hex digest of the given bytes.
pub fn sha512_hex(data: &[u8]) -> String {
    let hash = Sha512::digest(data);
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha512_hex(b"");
        assert_eq!(
            hash,
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn consistent_output() {
        let data = b"hello world";
        assert_eq!(sha512_hex(data), sha512_hex(data));
        assert_eq!(sha512_hex(data).len(), 128);
    }
}
