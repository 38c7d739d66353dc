//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - The `CredentialRecord` type (`record`)
//! - Binary vault file format with a sealed body (`format`)
//! - `CredentialStore` for reading and atomically rewriting a vault (`store`)

pub mod format;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use format::VaultHeader;
pub use record::CredentialRecord;
pub use store::CredentialStore;
