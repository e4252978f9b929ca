//! Common utilities and types shared across PocketVault modules.
//!
//! This module provides the error taxonomy, validated identifiers and the
//! money tolerance used by both the vaults and the settlement engine.

pub mod error;
pub mod money;
pub mod types;

pub use error::{Error, Result};
pub use types::{EntryId, SensitiveString, SlotKey};
