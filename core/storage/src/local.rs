//! Local filesystem storage provider.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::provider::SlotProvider;
use pocketvault_common::{Error, Result, SlotKey};

/// File extension used for slot files.
pub const SLOT_EXTENSION: &str = "vault";

/// Local filesystem slot provider.
///
/// Each slot is one file `<root>/<key>.vault` containing the ciphertext.
pub struct LocalProvider {
    root: PathBuf,
}

impl LocalProvider {
    /// Create a new local provider with the given root directory.
    ///
    /// # Postconditions
    /// - Root directory is created if it doesn't exist
    ///
    /// # Errors
    /// - Permission denied or other I/O failure while creating the root
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        // Sync for constructor
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }

        Ok(Self { root })
    }

    /// Root directory of this provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &SlotKey) -> PathBuf {
        self.root.join(format!("{}.{}", key.as_str(), SLOT_EXTENSION))
    }
}

#[async_trait]
impl SlotProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn read(&self, key: &SlotKey) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(&self, key: &SlotKey, value: String) -> Result<()> {
        let path = self.slot_path(key);
        let staging = path.with_extension(format!("{}.tmp", SLOT_EXTENSION));

        // Stage, then rename over the target: readers never see a partial slot.
        fs::write(&staging, value.as_bytes()).await?;
        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(Error::Storage(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        debug!(slot = %key, size = value.len(), "Slot written");
        Ok(())
    }

    async fn exists(&self, key: &SlotKey) -> Result<bool> {
        Ok(fs::try_exists(self.slot_path(key)).await?)
    }

    async fn remove(&self, key: &SlotKey) -> Result<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(slot = %key, "Slot removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(format!("Slot not found: {}", key)))
            }
            Err(e) => Err(e.into()),
        }
    }
}
