//! In-memory storage provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::provider::SlotProvider;
use pocketvault_common::{Error, Result, SlotKey};

/// In-memory slot provider.
///
/// Clones share the same underlying map, which lets a test hand one
/// handle to a vault and keep another to inspect or corrupt the stored
/// ciphertext. All data is lost when the last clone is dropped.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryProvider {
    /// Create a new empty memory provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SlotProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self, key: &SlotKey) -> Result<Option<String>> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key.as_str()).cloned())
    }

    async fn write(&self, key: &SlotKey, value: String) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn exists(&self, key: &SlotKey) -> Result<bool> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        Ok(slots.contains_key(key.as_str()))
    }

    async fn remove(&self, key: &SlotKey) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        match slots.remove(key.as_str()) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(format!("Slot not found: {}", key))),
        }
    }
}
