//! Passphrase fingerprints.
//!
//! A fingerprint is the lowercase hex SHA-256 of the passphrase. It is
//! stored inside the encrypted vault, so it only confirms a passphrase
//! after decryption has already succeeded.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compute the fingerprint of `passphrase`.
pub fn fingerprint(passphrase: &[u8]) -> String {
    hex::encode(Sha256::digest(passphrase))
}

/// Check `passphrase` against a stored fingerprint in constant time.
pub fn verify_fingerprint(passphrase: &[u8], expected: &str) -> bool {
    let actual = fingerprint(passphrase);
    actual.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            fingerprint(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(fingerprint(b"secret123"), fingerprint(b"secret123"));
        assert_ne!(fingerprint(b"secret123"), fingerprint(b"secret124"));
    }

    #[test]
    fn test_verify() {
        let stored = fingerprint(b"secret123");
        assert!(verify_fingerprint(b"secret123", &stored));
        assert!(!verify_fingerprint(b"Secret123", &stored));
        assert!(!verify_fingerprint(b"secret123", ""));
    }
}
