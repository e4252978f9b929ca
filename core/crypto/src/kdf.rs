//! Argon2id key derivation.
//!
//! Every call to `VaultCodec::encrypt` derives a new key from the master
//! passphrase and a fresh salt. The cost parameters are stored next to the
//! salt, so a vault sealed under one preset opens under any codec.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::keys::{MasterKey, Salt, KEY_LENGTH};
use pocketvault_common::{Error, Result};

/// Upper bounds accepted for parameters read from an envelope.
const MAX_MEMORY_KIB: u32 = 256 * 1024;
const MAX_TIME_COST: u32 = 16;
const MAX_PARALLELISM: u32 = 16;

/// Argon2id cost settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory in KiB.
    pub memory_cost: u32,
    /// Passes over memory.
    pub time_cost: u32,
    /// Lanes.
    pub parallelism: u32,
}

impl KdfParams {
    /// 64 MiB, 3 passes, 4 lanes.
    pub fn interactive() -> Self {
        Self {
            memory_cost: 64 * 1024,
            time_cost: 3,
            parallelism: 4,
        }
    }

    /// 32 MiB, 3 passes, 2 lanes. Fits phones and small VMs.
    pub fn moderate() -> Self {
        Self {
            memory_cost: 32 * 1024,
            time_cost: 3,
            parallelism: 2,
        }
    }

    /// 256 MiB, 4 passes, 4 lanes. Takes seconds per unlock.
    pub fn sensitive() -> Self {
        Self {
            memory_cost: MAX_MEMORY_KIB,
            time_cost: 4,
            parallelism: 4,
        }
    }

    /// Look up a preset by the name used in `--strength`.
    pub fn from_preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "interactive" => Ok(Self::interactive()),
            "moderate" => Ok(Self::moderate()),
            "sensitive" => Ok(Self::sensitive()),
            other => Err(Error::InvalidInput(format!(
                "Unknown KDF strength '{}'. Use: interactive, moderate, or sensitive",
                other
            ))),
        }
    }

    /// False for parameters that would make a single derivation
    /// unreasonably expensive.
    pub fn within_limits(&self) -> bool {
        self.memory_cost <= MAX_MEMORY_KIB
            && self.time_cost <= MAX_TIME_COST
            && self.parallelism <= MAX_PARALLELISM
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::moderate()
    }
}

/// Stretch `passphrase` into a 256-bit key.
///
/// The result depends only on the three inputs.
///
/// # Errors
/// - `InvalidInput` for an empty passphrase
/// - `Crypto` when Argon2 rejects `params` (e.g. zero passes)
pub fn derive_key(passphrase: &[u8], salt: &Salt, params: &KdfParams) -> Result<MasterKey> {
    if passphrase.is_empty() {
        return Err(Error::InvalidInput(
            "Master password cannot be empty".to_string(),
        ));
    }

    let argon2 = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map(|p| Argon2::new(Algorithm::Argon2id, Version::V0x13, p))
    .map_err(|e| Error::Crypto(format!("Rejected Argon2 parameters: {}", e)))?;

    let mut output = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase, salt.as_bytes(), &mut output)
        .map_err(|e| Error::Crypto(format!("Argon2 failed: {}", e)))?;

    Ok(MasterKey::from_bytes(output))
}
