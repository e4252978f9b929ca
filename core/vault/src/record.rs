//! The seam between the generic vault store and its record types.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use pocketvault_common::{EntryId, Result};

/// A record kind that can live inside a vault.
pub trait VaultRecord: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// User-supplied fields for a new record, before an id is assigned.
    type Draft: Send;

    /// Short name used in logs and messages (e.g. "password entry").
    const KIND: &'static str;

    /// Well-known storage slot for this vault kind.
    const SLOT: &'static str;

    /// Identifier of this record.
    fn id(&self) -> &EntryId;

    /// Validate a draft and turn it into a record with a fresh id.
    ///
    /// # Errors
    /// - `Validation` naming the first missing or invalid field
    fn from_draft(draft: Self::Draft, now: DateTime<Utc>) -> Result<Self>;

    /// Check that required fields are present.
    fn validate(&self) -> Result<()>;

    /// Carry bookkeeping over from the stored version when replacing it.
    fn refresh(&mut self, _previous: &Self, _now: DateTime<Utc>) {}
}
