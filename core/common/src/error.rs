//! Common error types for PocketVault.

use thiserror::Error;

/// Top-level error type for PocketVault operations.
///
/// Each variant carries a message meant to be shown to the end user as-is,
/// so the wording stays specific to what the user has to do next.
#[derive(Debug, Error)]
pub enum Error {
    /// `create` was called while a vault is already stored in the slot.
    #[error("Vault already exists: {0}. Unlock it instead")]
    VaultAlreadyExists(String),

    /// No vault is stored in the slot.
    #[error("No vault found: {0}. Create one first")]
    VaultNotFound(String),

    /// The stored vault could not be opened with the given passphrase.
    #[error("Incorrect master password or corrupt vault")]
    UnlockFailed,

    /// Ciphertext could not be decrypted.
    ///
    /// A wrong passphrase and a corrupt ciphertext look the same here.
    #[error("Decryption failed: incorrect password or corrupt data")]
    Decryption,

    /// A required field is missing or invalid.
    #[error("Missing required field: {0}")]
    Validation(String),

    /// Decrypted import data does not have the shape of a vault.
    #[error("Invalid vault format: {0}")]
    Import(String),

    /// Entry not found in an unlocked vault.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
