//! Lifecycle of one encrypted collection of records.

use chrono::Utc;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::blob::VaultBlob;
use crate::password::PasswordEntry;
use crate::record::VaultRecord;
use crate::transaction::Transaction;
use pocketvault_common::{EntryId, Error, Result, SlotKey};
use pocketvault_crypto::{fingerprint, verify_fingerprint, VaultCodec};
use pocketvault_storage::SlotProvider;

/// Vault of password entries.
pub type PasswordVault = VaultStore<PasswordEntry>;

/// Vault of finance transactions.
pub type FinanceVault = VaultStore<Transaction>;

/// Owns one encrypted vault of `R` records stored in a single slot.
///
/// The store itself holds no plaintext. `unlock` hands the decrypted
/// [`VaultBlob`] to the caller, and every mutation takes that blob back,
/// changes it, re-encrypts the whole thing and overwrites the slot.
/// Writes are last-writer-wins; there is no merge or version check.
pub struct VaultStore<R> {
    provider: Arc<dyn SlotProvider>,
    slot: SlotKey,
    codec: VaultCodec,
    _records: PhantomData<fn() -> R>,
}

impl<R: VaultRecord> VaultStore<R> {
    /// Create a store over `slot` of `provider`.
    pub fn new(provider: Arc<dyn SlotProvider>, slot: SlotKey, codec: VaultCodec) -> Self {
        Self {
            provider,
            slot,
            codec,
            _records: PhantomData,
        }
    }

    /// Create a store bound to the record kind's well-known slot
    /// (`password_vault` or `finance_vault`).
    pub fn for_default_slot(provider: Arc<dyn SlotProvider>, codec: VaultCodec) -> Result<Self> {
        Ok(Self::new(provider, SlotKey::new(R::SLOT)?, codec))
    }

    /// Slot this store reads and writes.
    pub fn slot(&self) -> &SlotKey {
        &self.slot
    }

    /// Whether a vault is stored. Needs no passphrase.
    pub async fn exists(&self) -> Result<bool> {
        self.provider.exists(&self.slot).await
    }

    /// Create an empty vault sealed with `passphrase`.
    ///
    /// # Postconditions
    /// - `exists()` returns true
    ///
    /// # Errors
    /// - `VaultAlreadyExists` if the slot is occupied
    /// - `InvalidInput` if the passphrase is empty
    pub async fn create(&self, passphrase: &[u8]) -> Result<()> {
        debug!(
            slot = %self.slot,
            provider = self.provider.name(),
            kind = R::KIND,
            memory_cost = self.codec.params().memory_cost,
            "Creating vault"
        );

        if self.exists().await? {
            return Err(Error::VaultAlreadyExists(self.slot.to_string()));
        }

        let blob = VaultBlob::<R>::new(passphrase);
        self.persist(&blob, passphrase).await?;

        info!(slot = %self.slot, "Vault created");
        Ok(())
    }

    /// Decrypt the stored vault.
    ///
    /// # Errors
    /// - `VaultNotFound` if nothing is stored
    /// - `UnlockFailed` for a wrong passphrase or a corrupt vault
    pub async fn unlock(&self, passphrase: &[u8]) -> Result<VaultBlob<R>> {
        debug!(slot = %self.slot, provider = self.provider.name(), "Unlocking vault");

        let ciphertext = self
            .provider
            .read(&self.slot)
            .await?
            .ok_or_else(|| Error::VaultNotFound(self.slot.to_string()))?;

        let blob: VaultBlob<R> = self
            .codec
            .decrypt(&ciphertext, passphrase)
            .map_err(|e| match e {
                Error::Decryption => Error::UnlockFailed,
                other => other,
            })?;

        if !verify_fingerprint(passphrase, &blob.master_password_hash) {
            warn!(slot = %self.slot, "Decrypted vault carries a different passphrase fingerprint");
            return Err(Error::UnlockFailed);
        }

        info!(slot = %self.slot, entries = blob.len(), "Vault unlocked");
        Ok(blob)
    }

    /// Encrypt `blob` and overwrite the stored vault.
    pub async fn persist(&self, blob: &VaultBlob<R>, passphrase: &[u8]) -> Result<()> {
        let ciphertext = self.codec.encrypt(blob, passphrase)?;
        self.provider.write(&self.slot, ciphertext).await?;

        debug!(slot = %self.slot, entries = blob.len(), "Vault persisted");
        Ok(())
    }

    /// Validate `draft`, append it as a new record and persist.
    ///
    /// # Errors
    /// - `Validation` if a required field is missing; nothing is persisted
    pub async fn add_entry(
        &self,
        draft: R::Draft,
        blob: VaultBlob<R>,
        passphrase: &[u8],
    ) -> Result<VaultBlob<R>> {
        let record = R::from_draft(draft, Utc::now())?;
        self.append(record, blob, passphrase).await
    }

    pub(crate) async fn append(
        &self,
        record: R,
        mut blob: VaultBlob<R>,
        passphrase: &[u8],
    ) -> Result<VaultBlob<R>> {
        let id = record.id().clone();
        blob.entries.push(record);

        self.persist(&blob, passphrase).await?;

        info!(slot = %self.slot, id = %id, "{} added", R::KIND);
        Ok(blob)
    }

    /// Replace the record with the same id as `record` and persist.
    ///
    /// # Errors
    /// - `Validation` if the replacement is missing a required field
    /// - `NotFound` if no record has that id; nothing is persisted
    pub async fn update_entry(
        &self,
        mut record: R,
        mut blob: VaultBlob<R>,
        passphrase: &[u8],
    ) -> Result<VaultBlob<R>> {
        record.validate()?;

        let index = blob
            .position(record.id())
            .ok_or_else(|| Error::NotFound(record.id().to_string()))?;
        record.refresh(&blob.entries[index], Utc::now());
        let id = record.id().clone();
        blob.entries[index] = record;

        self.persist(&blob, passphrase).await?;

        info!(slot = %self.slot, id = %id, "{} updated", R::KIND);
        Ok(blob)
    }

    /// Remove the record with `id` and persist.
    ///
    /// The remaining records keep their order.
    ///
    /// # Errors
    /// - `NotFound` if no record has that id; nothing is persisted
    pub async fn delete_entry(
        &self,
        id: &EntryId,
        mut blob: VaultBlob<R>,
        passphrase: &[u8],
    ) -> Result<VaultBlob<R>> {
        let index = blob
            .position(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        blob.entries.remove(index);

        self.persist(&blob, passphrase).await?;

        info!(slot = %self.slot, id = %id, "{} deleted", R::KIND);
        Ok(blob)
    }

    /// Encrypt `blob` for download without touching storage.
    pub fn export_encrypted(&self, blob: &VaultBlob<R>, passphrase: &[u8]) -> Result<String> {
        self.codec.encrypt(blob, passphrase)
    }

    /// Decrypt an exported vault and check its structure.
    ///
    /// Storage is not touched; see [`VaultStore::restore`].
    ///
    /// # Errors
    /// - `Decryption` for a wrong passphrase or corrupt data
    /// - `Import` if the plaintext is not a vault of `R` records, or a
    ///   record is missing a required field
    pub fn import_encrypted(&self, ciphertext: &str, passphrase: &[u8]) -> Result<VaultBlob<R>> {
        let value = self.codec.decrypt_value(ciphertext, passphrase)?;
        let blob: VaultBlob<R> = VaultBlob::from_value(value)?;
        for entry in &blob.entries {
            entry
                .validate()
                .map_err(|e| Error::Import(format!("{} {}: {}", R::KIND, entry.id(), e)))?;
        }
        Ok(blob)
    }

    /// Import an exported vault and store it in place of the current one.
    ///
    /// # Errors
    /// - Everything `import_encrypted` reports
    /// - `Import` if the exported vault's fingerprint does not match
    ///   `passphrase`, since the stored vault could never be unlocked
    pub async fn restore(&self, ciphertext: &str, passphrase: &[u8]) -> Result<VaultBlob<R>> {
        let blob = self.import_encrypted(ciphertext, passphrase)?;
        if !verify_fingerprint(passphrase, &blob.master_password_hash) {
            return Err(Error::Import(
                "master password fingerprint does not match".to_string(),
            ));
        }

        self.persist(&blob, passphrase).await?;

        info!(slot = %self.slot, entries = blob.len(), "Vault restored from export");
        Ok(blob)
    }

    /// Re-seal the vault under a new passphrase.
    ///
    /// # Errors
    /// - `UnlockFailed` if `old` does not match the blob's fingerprint
    /// - `InvalidInput` if `new` is empty
    pub async fn change_passphrase(
        &self,
        mut blob: VaultBlob<R>,
        old: &[u8],
        new: &[u8],
    ) -> Result<VaultBlob<R>> {
        if !verify_fingerprint(old, &blob.master_password_hash) {
            return Err(Error::UnlockFailed);
        }
        if new.is_empty() {
            return Err(Error::InvalidInput(
                "Master password cannot be empty".to_string(),
            ));
        }

        blob.master_password_hash = fingerprint(new);
        self.persist(&blob, new).await?;

        info!(slot = %self.slot, "Master password changed");
        Ok(blob)
    }

    /// Delete the stored vault.
    ///
    /// # Errors
    /// - `VaultNotFound` if nothing is stored
    pub async fn destroy(&self) -> Result<()> {
        self.provider.remove(&self.slot).await.map_err(|e| match e {
            Error::NotFound(_) => Error::VaultNotFound(self.slot.to_string()),
            other => other,
        })?;

        warn!(slot = %self.slot, "Vault destroyed");
        Ok(())
    }
}
