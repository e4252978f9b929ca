//! Key and salt types.

use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 256-bit symmetric keys.
pub const KEY_LENGTH: usize = 32;

/// Argon2 salt size.
pub const SALT_LENGTH: usize = 32;

/// Symmetric key derived from the master passphrase.
///
/// Lives only for the duration of one encrypt or decrypt call and is wiped
/// when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_LENGTH]);

impl MasterKey {
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// Random per-encryption salt. Not secret; stored in the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Fresh salt from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// `None` unless `bytes` is exactly [`SALT_LENGTH`] long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salts_are_random() {
        assert_ne!(Salt::generate(), Salt::generate());
    }

    #[test]
    fn test_salt_from_slice_checks_length() {
        let salt = Salt::from_slice(&[7u8; SALT_LENGTH]).unwrap();
        assert_eq!(salt.as_bytes(), &[7u8; SALT_LENGTH]);
        assert!(Salt::from_slice(&[7u8; 16]).is_none());
        assert!(Salt::from_slice(&[]).is_none());
    }

    #[test]
    fn test_master_key_debug_redacted() {
        let key = MasterKey::from_bytes([9u8; KEY_LENGTH]);
        assert_eq!(format!("{:?}", key), "MasterKey([REDACTED])");
    }
}
