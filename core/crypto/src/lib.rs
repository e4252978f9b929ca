//! Cryptographic primitives for PocketVault.
//!
//! This module provides:
//! - Key derivation using Argon2id
//! - Authenticated encryption using XChaCha20-Poly1305
//! - `VaultCodec`, which encrypts whole JSON documents under a passphrase
//! - Passphrase fingerprints
//! - Password generation and strength scoring
//!
//! # Security Guarantees
//! - Key material and decrypted plaintext buffers are zeroized on drop
//! - No plaintext, passphrase or key material is ever logged

pub mod aead;
pub mod codec;
pub mod fingerprint;
pub mod generator;
pub mod kdf;
pub mod keys;

pub use codec::VaultCodec;
pub use fingerprint::{fingerprint, verify_fingerprint};
pub use generator::{evaluate_strength, generate_password, GeneratorOptions, PasswordStrength};
pub use kdf::{derive_key, KdfParams};
pub use keys::{MasterKey, Salt};
