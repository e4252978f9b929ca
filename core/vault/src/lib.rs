//! Encrypted local vaults for PocketVault.
//!
//! This module provides:
//! - `VaultStore<R>`, the lifecycle of one encrypted collection of records
//!   (create, unlock, add/update/delete, export/import, change passphrase)
//! - The two record kinds: password entries and finance transactions
//! - `VaultSession`, an unlocked vault held in memory until it is locked
//! - Summaries over finance transactions
//!
//! # Architecture
//! A store sits between the caller and a `SlotProvider`, sealing the
//! whole vault with `VaultCodec` on every write. Plaintext only ever lives
//! in the `VaultBlob` owned by the caller or a session.

pub mod blob;
pub mod finance;
pub mod password;
pub mod record;
pub mod session;
pub mod store;
pub mod transaction;

pub use blob::VaultBlob;
pub use password::{PasswordDraft, PasswordEntry};
pub use record::VaultRecord;
pub use session::VaultSession;
pub use store::{FinanceVault, PasswordVault, VaultStore};
pub use transaction::{parse_date, Transaction, TransactionDraft, TransactionKind};
