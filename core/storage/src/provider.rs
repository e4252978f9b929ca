//! Storage provider trait definition.

use async_trait::async_trait;

use pocketvault_common::{Result, SlotKey};

/// Storage for named string slots.
///
/// Each vault kind owns exactly one slot holding its whole ciphertext.
/// Presence of a slot is the only "vault exists" signal, and writes always
/// replace the full value (last writer wins).
#[async_trait]
pub trait SlotProvider: Send + Sync {
    /// Get the provider name (e.g., "memory", "local").
    fn name(&self) -> &str;

    /// Read the value stored under `key`, or `None` if the slot is empty.
    async fn read(&self, key: &SlotKey) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Postconditions
    /// - A subsequent `read` returns exactly `value`
    async fn write(&self, key: &SlotKey, value: String) -> Result<()>;

    /// Check whether a value is stored under `key`.
    async fn exists(&self, key: &SlotKey) -> Result<bool> {
        Ok(self.read(key).await?.is_some())
    }

    /// Remove the value stored under `key`.
    ///
    /// # Errors
    /// - `NotFound` if the slot is empty
    async fn remove(&self, key: &SlotKey) -> Result<()>;
}
