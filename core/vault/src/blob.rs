//! The decrypted contents of a vault.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::VaultRecord;
use pocketvault_common::{EntryId, Error, Result};
use pocketvault_crypto::fingerprint;

/// Plaintext vault: the passphrase fingerprint plus the records, in
/// insertion order.
///
/// Always encrypted and stored as a whole; there is no partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultBlob<R> {
    /// Fingerprint of the master passphrase this blob was sealed with.
    #[serde(rename = "masterPasswordHash")]
    pub master_password_hash: String,
    /// Records in insertion order.
    pub entries: Vec<R>,
}

impl<R: VaultRecord> VaultBlob<R> {
    /// Create an empty blob for `passphrase`.
    pub fn new(passphrase: &[u8]) -> Self {
        Self {
            master_password_hash: fingerprint(passphrase),
            entries: Vec::new(),
        }
    }

    /// Find a record by id.
    pub fn find(&self, id: &EntryId) -> Option<&R> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub(crate) fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vault holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that decrypted JSON has the shape of a vault and convert it.
    ///
    /// # Errors
    /// - `Import` if `masterPasswordHash` is missing or empty, if `entries`
    ///   is not a list, or if any entry is not a valid record
    pub fn from_value(value: Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Import("expected a JSON object".to_string()))?;

        match object.get("masterPasswordHash") {
            Some(Value::String(hash)) if !hash.is_empty() => {}
            _ => {
                return Err(Error::Import(
                    "masterPasswordHash is missing".to_string(),
                ))
            }
        }
        if !matches!(object.get("entries"), Some(Value::Array(_))) {
            return Err(Error::Import("entries must be a list".to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::Import(format!("invalid {}: {}", R::KIND, e)))
    }
}
