//! Passphrase-keyed encryption of JSON-serializable values.
//!
//! `VaultCodec` turns any serializable value into one opaque string and
//! back. The string is base64 of a small JSON envelope:
//!
//! ```text
//! {"v":1,"kdf":{"memory_cost":..,"time_cost":..,"parallelism":..},
//!  "salt":"<base64>","data":"<base64 nonce || ciphertext || tag>"}
//! ```
//!
//! Salt and nonce are fresh for every call, so encrypting the same value
//! twice never yields the same string. The KDF parameters travel with the
//! ciphertext, so a vault stays readable when the configured preset changes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::aead;
use crate::kdf::{derive_key, KdfParams};
use crate::keys::Salt;
use pocketvault_common::{Error, Result};

/// Envelope format version.
pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    v: u32,
    kdf: KdfParams,
    salt: String,
    data: String,
}

/// Symmetric codec keyed by a master passphrase.
#[derive(Debug, Clone, Default)]
pub struct VaultCodec {
    params: KdfParams,
}

impl VaultCodec {
    /// Create a codec that derives keys for new encryptions with `params`.
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    /// KDF parameters used for new encryptions.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Serialize `value` to JSON and encrypt it under `passphrase`.
    ///
    /// # Errors
    /// - `InvalidInput` if the passphrase is empty
    /// - `Serialization` if the value cannot be serialized
    /// - `Crypto` if key derivation or encryption fails
    pub fn encrypt<T: Serialize + ?Sized>(&self, value: &T, passphrase: &[u8]) -> Result<String> {
        if passphrase.is_empty() {
            return Err(Error::InvalidInput(
                "Master password cannot be empty".to_string(),
            ));
        }

        let plaintext = Zeroizing::new(
            serde_json::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))?,
        );

        let salt = Salt::generate();
        let key = derive_key(passphrase, &salt, &self.params)?;
        let sealed = aead::encrypt(&key, &plaintext)?;

        let envelope = Envelope {
            v: ENVELOPE_VERSION,
            kdf: self.params,
            salt: STANDARD.encode(salt.as_bytes()),
            data: STANDARD.encode(sealed),
        };
        let encoded =
            serde_json::to_vec(&envelope).map_err(|e| Error::Serialization(e.to_string()))?;

        debug!(plaintext_len = plaintext.len(), "Payload encrypted");
        Ok(STANDARD.encode(encoded))
    }

    /// Decrypt a string produced by [`VaultCodec::encrypt`] into raw JSON.
    ///
    /// # Errors
    /// - `Decryption` for a wrong passphrase or any kind of corrupt input;
    ///   the two cannot be told apart
    pub fn decrypt_value(&self, ciphertext: &str, passphrase: &[u8]) -> Result<serde_json::Value> {
        let plaintext = self.open(ciphertext, passphrase)?;
        serde_json::from_slice(&plaintext).map_err(|_| Error::Decryption)
    }

    /// Decrypt and deserialize into `T`.
    ///
    /// A plaintext that is valid JSON but not a `T` is also a `Decryption`
    /// error.
    pub fn decrypt<T: DeserializeOwned>(&self, ciphertext: &str, passphrase: &[u8]) -> Result<T> {
        let plaintext = self.open(ciphertext, passphrase)?;
        serde_json::from_slice(&plaintext).map_err(|_| Error::Decryption)
    }

    fn open(&self, ciphertext: &str, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if passphrase.is_empty() {
            return Err(Error::Decryption);
        }

        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| Error::Decryption)?;
        let envelope: Envelope = serde_json::from_slice(&raw).map_err(|_| Error::Decryption)?;

        if envelope.v != ENVELOPE_VERSION || !envelope.kdf.within_limits() {
            debug!(version = envelope.v, "Rejecting envelope");
            return Err(Error::Decryption);
        }

        let salt_bytes = STANDARD
            .decode(&envelope.salt)
            .map_err(|_| Error::Decryption)?;
        let salt = Salt::from_slice(&salt_bytes).ok_or(Error::Decryption)?;
        let sealed = STANDARD
            .decode(&envelope.data)
            .map_err(|_| Error::Decryption)?;

        let key = derive_key(passphrase, &salt, &envelope.kdf).map_err(|_| Error::Decryption)?;
        let plaintext = aead::decrypt(&key, &sealed)?;

        debug!(plaintext_len = plaintext.len(), "Payload decrypted");
        Ok(Zeroizing::new(plaintext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn codec() -> VaultCodec {
        VaultCodec::new(KdfParams {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_roundtrip() {
        let value = json!({"masterPasswordHash": "abc", "entries": [{"id": "1", "label": "Gmail"}]});
        let ct = codec().encrypt(&value, b"secret123").unwrap();
        let back = codec().decrypt_value(&ct, b"secret123").unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_wrong_passphrase_rejected() {
        let ct = codec().encrypt(&json!({"a": 1}), b"secret123").unwrap();
        assert!(matches!(
            codec().decrypt_value(&ct, b"secret124"),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn test_non_deterministic() {
        let value = json!({"entries": []});
        let a = codec().encrypt(&value, b"pw").unwrap();
        let b = codec().encrypt(&value, b"pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_input_is_decryption_error() {
        let ct = codec().encrypt(&json!([1, 2, 3]), b"pw").unwrap();

        assert!(matches!(
            codec().decrypt_value("not base64 at all!", b"pw"),
            Err(Error::Decryption)
        ));
        assert!(matches!(
            codec().decrypt_value(&STANDARD.encode(b"{}"), b"pw"),
            Err(Error::Decryption)
        ));
        assert!(matches!(
            codec().decrypt_value(&ct[..ct.len() / 2], b"pw"),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn test_tampered_data_rejected() {
        let ct = codec().encrypt(&json!({"k": "v"}), b"pw").unwrap();
        let raw = STANDARD.decode(&ct).unwrap();
        let mut envelope: Envelope = serde_json::from_slice(&raw).unwrap();
        let mut sealed = STANDARD.decode(&envelope.data).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        envelope.data = STANDARD.encode(sealed);
        let tampered = STANDARD.encode(serde_json::to_vec(&envelope).unwrap());

        assert!(matches!(
            codec().decrypt_value(&tampered, b"pw"),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn test_excessive_kdf_params_rejected() {
        let ct = codec().encrypt(&json!(null), b"pw").unwrap();
        let raw = STANDARD.decode(&ct).unwrap();
        let mut envelope: Envelope = serde_json::from_slice(&raw).unwrap();
        envelope.kdf.memory_cost = u32::MAX;
        let inflated = STANDARD.encode(serde_json::to_vec(&envelope).unwrap());

        assert!(matches!(
            codec().decrypt_value(&inflated, b"pw"),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn test_params_travel_with_ciphertext() {
        let ct = codec().encrypt(&json!({"x": true}), b"pw").unwrap();
        let other = VaultCodec::new(KdfParams {
            memory_cost: 2048,
            time_cost: 2,
            parallelism: 1,
        });
        assert_eq!(other.decrypt_value(&ct, b"pw").unwrap(), json!({"x": true}));
    }

    #[test]
    fn test_typed_decrypt_shape_mismatch() {
        #[derive(Debug, Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            entries: Vec<String>,
        }

        let ct = codec().encrypt(&json!({"entries": "nope"}), b"pw").unwrap();
        assert!(matches!(
            codec().decrypt::<Shape>(&ct, b"pw"),
            Err(Error::Decryption)
        ));
    }

    #[test]
    fn test_empty_passphrase() {
        assert!(matches!(
            codec().encrypt(&json!({}), b""),
            Err(Error::InvalidInput(_))
        ));
        let ct = codec().encrypt(&json!({}), b"pw").unwrap();
        assert!(matches!(
            codec().decrypt_value(&ct, b""),
            Err(Error::Decryption)
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_roundtrip(text in ".{0,64}", n in any::<i64>(), pass in "[a-zA-Z0-9]{1,24}") {
            let value = json!({"text": text, "n": n});
            let ct = codec().encrypt(&value, pass.as_bytes()).unwrap();
            prop_assert_eq!(codec().decrypt_value(&ct, pass.as_bytes()).unwrap(), value);
        }

        #[test]
        fn prop_other_passphrase_fails(p1 in "[a-z]{4,12}", p2 in "[a-z]{4,12}") {
            prop_assume!(p1 != p2);
            let ct = codec().encrypt(&json!({"secret": 1}), p1.as_bytes()).unwrap();
            prop_assert!(codec().decrypt_value(&ct, p2.as_bytes()).is_err());
        }
    }
}
