//! Unlocked vault sessions.
//!
//! A session holds the decrypted blob and the master passphrase between
//! user actions. Locking (or dropping) the session discards both; the
//! passphrase buffer is zeroized.

use chrono::Utc;
use tracing::info;

use crate::blob::VaultBlob;
use crate::record::VaultRecord;
use crate::store::VaultStore;
use pocketvault_common::{EntryId, Result, SensitiveString};

/// State of a vault while it is unlocked in memory.
pub struct VaultSession<'a, R: VaultRecord> {
    store: &'a VaultStore<R>,
    blob: VaultBlob<R>,
    passphrase: SensitiveString,
}

impl<R: VaultRecord> VaultStore<R> {
    /// Unlock the vault and keep it open in a session.
    ///
    /// # Errors
    /// - Everything [`VaultStore::unlock`] reports
    pub async fn open_session(&self, passphrase: &str) -> Result<VaultSession<'_, R>> {
        let blob = self.unlock(passphrase.as_bytes()).await?;
        Ok(VaultSession {
            store: self,
            blob,
            passphrase: SensitiveString::new(passphrase),
        })
    }

    /// Create a new vault and open a session on it.
    pub async fn create_session(&self, passphrase: &str) -> Result<VaultSession<'_, R>> {
        self.create(passphrase.as_bytes()).await?;
        self.open_session(passphrase).await
    }
}

impl<'a, R: VaultRecord> VaultSession<'a, R> {
    /// Records in insertion order.
    pub fn entries(&self) -> &[R] {
        &self.blob.entries
    }

    /// The decrypted blob.
    pub fn blob(&self) -> &VaultBlob<R> {
        &self.blob
    }

    /// Find a record by id.
    pub fn find(&self, id: &EntryId) -> Option<&R> {
        self.blob.find(id)
    }

    /// Add a record; returns the new record's id.
    pub async fn add(&mut self, draft: R::Draft) -> Result<EntryId> {
        let record = R::from_draft(draft, Utc::now())?;
        let id = record.id().clone();
        self.blob = self
            .store
            .append(record, self.blob.clone(), self.passphrase.as_bytes())
            .await?;
        Ok(id)
    }

    /// Replace a record by id.
    pub async fn update(&mut self, record: R) -> Result<()> {
        self.blob = self
            .store
            .update_entry(record, self.blob.clone(), self.passphrase.as_bytes())
            .await?;
        Ok(())
    }

    /// Remove a record by id.
    pub async fn delete(&mut self, id: &EntryId) -> Result<()> {
        self.blob = self
            .store
            .delete_entry(id, self.blob.clone(), self.passphrase.as_bytes())
            .await?;
        Ok(())
    }

    /// Export the vault as ciphertext under the session passphrase.
    pub fn export(&self) -> Result<String> {
        self.store
            .export_encrypted(&self.blob, self.passphrase.as_bytes())
    }

    /// Re-seal under `new_passphrase`; the session continues with it.
    pub async fn change_passphrase(&mut self, new_passphrase: &str) -> Result<()> {
        self.blob = self
            .store
            .change_passphrase(
                self.blob.clone(),
                self.passphrase.as_bytes(),
                new_passphrase.as_bytes(),
            )
            .await?;
        self.passphrase = SensitiveString::new(new_passphrase);
        Ok(())
    }

    /// Discard the plaintext and the passphrase.
    pub fn lock(self) {
        info!(slot = %self.store.slot(), "Vault locked");
    }
}

#[cfg(test)]
mod tests {
    use crate::password::PasswordDraft;
    use crate::store::{FinanceVault, PasswordVault};
    use crate::transaction::{TransactionDraft, TransactionKind};
    use pocketvault_common::Error;
    use pocketvault_crypto::{KdfParams, VaultCodec};
    use pocketvault_storage::MemoryProvider;
    use std::sync::Arc;

    fn codec() -> VaultCodec {
        VaultCodec::new(KdfParams {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        })
    }

    #[tokio::test]
    async fn test_session_crud() {
        let vault =
            PasswordVault::for_default_slot(Arc::new(MemoryProvider::new()), codec()).unwrap();
        let mut session = vault.create_session("secret123").await.unwrap();

        let id = session
            .add(PasswordDraft::new("Gmail", "x").username("me"))
            .await
            .unwrap();
        assert_eq!(session.find(&id).unwrap().label, "Gmail");

        let mut edited = session.find(&id).unwrap().clone();
        edited.notes = Some("2FA on".into());
        session.update(edited).await.unwrap();
        assert_eq!(session.entries()[0].notes.as_deref(), Some("2FA on"));

        session.delete(&id).await.unwrap();
        assert!(session.entries().is_empty());
        session.lock();

        assert!(vault.unlock(b"secret123").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_session_state() {
        let vault =
            FinanceVault::for_default_slot(Arc::new(MemoryProvider::new()), codec()).unwrap();
        let mut session = vault.create_session("pw").await.unwrap();

        session
            .add(TransactionDraft {
                amount: 10.0,
                kind: TransactionKind::Expense,
                category: "Food".into(),
                description: "Lunch".into(),
                date: None,
            })
            .await
            .unwrap();

        let result = session
            .add(TransactionDraft {
                amount: -1.0,
                kind: TransactionKind::Expense,
                category: "Food".into(),
                description: "Refund?".into(),
                date: None,
            })
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(session.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_session_change_passphrase_and_export() {
        let vault =
            PasswordVault::for_default_slot(Arc::new(MemoryProvider::new()), codec()).unwrap();
        let mut session = vault.create_session("first-pass").await.unwrap();
        session.add(PasswordDraft::new("Bank", "x")).await.unwrap();

        session.change_passphrase("second-pass").await.unwrap();
        session.add(PasswordDraft::new("Mail", "y")).await.unwrap();

        let exported = session.export().unwrap();
        session.lock();

        let blob = vault.import_encrypted(&exported, b"second-pass").unwrap();
        assert_eq!(blob.len(), 2);
        assert_eq!(vault.unlock(b"second-pass").await.unwrap().len(), 2);
    }
}
