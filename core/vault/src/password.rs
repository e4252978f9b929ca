//! Password manager records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::VaultRecord;
use pocketvault_common::{EntryId, Error, Result};

/// One stored credential.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordEntry {
    pub id: EntryId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields for a new password entry.
#[derive(Clone, Default)]
pub struct PasswordDraft {
    pub label: String,
    pub username: Option<String>,
    pub password: String,
    pub notes: Option<String>,
}

impl PasswordDraft {
    pub fn new(label: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_required(label: &str, password: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(Error::Validation("label".to_string()));
    }
    if password.is_empty() {
        return Err(Error::Validation("password".to_string()));
    }
    Ok(())
}

impl VaultRecord for PasswordEntry {
    type Draft = PasswordDraft;

    const KIND: &'static str = "password entry";
    const SLOT: &'static str = "password_vault";

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn from_draft(draft: PasswordDraft, now: DateTime<Utc>) -> Result<Self> {
        check_required(&draft.label, &draft.password)?;
        Ok(Self {
            id: EntryId::generate(),
            label: draft.label,
            username: non_blank(draft.username),
            password: draft.password,
            notes: non_blank(draft.notes),
            created_at: now,
            updated_at: now,
        })
    }

    fn validate(&self) -> Result<()> {
        check_required(&self.label, &self.password)
    }

    fn refresh(&mut self, previous: &Self, now: DateTime<Utc>) {
        self.created_at = previous.created_at;
        self.updated_at = now;
    }
}
