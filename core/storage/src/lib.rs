//! Storage provider abstraction for PocketVault.
//!
//! A vault is persisted as one opaque string in one named slot. This
//! module provides the `SlotProvider` trait and two backends: an
//! in-memory provider for tests and a local-directory provider.
//!
//! Providers are injected into vault stores, so nothing in the vault or
//! crypto modules refers to a global storage location.

pub mod local;
pub mod memory;
pub mod provider;

pub use local::LocalProvider;
pub use memory::MemoryProvider;
pub use provider::SlotProvider;
