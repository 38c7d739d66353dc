//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM sealing of the vault body (`encryption`)
//! - Argon2id master-key stretching (`kdf`)
//! - HKDF working-key and verifier derivation (`keys`)
//! - Random password generation (`generator`)

pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive, verify, seal, open, ...};
pub use encryption::{open, seal};
pub use generator::generate_password;
pub use kdf::{generate_salt, Argon2Params};
pub use keys::{derive, verify, KeyMaterial, WorkingKey};
