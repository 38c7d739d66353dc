//! Working key and verifier derivation.
//!
//! From the Argon2id root key we expand, with HKDF-SHA256, two
//! independent sub-keys:
//! - the **working key** that seals the vault body, and
//! - a **verifier key**, which is only ever used to MAC a fixed context
//!   string.  That MAC is the verifier stored in the vault header.
//!
//! Because the two sub-keys come from different HKDF `info` strings,
//! publishing the verifier reveals nothing about the working key.

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kdf::{stretch, Argon2Params};
use crate::errors::{PassVaultError, Result};

/// Length of derived sub-keys and of the verifier (256 bits).
pub const KEY_LEN: usize = 32;

const WORKING_KEY_INFO: &[u8] = b"passvault-working-key";
const VERIFIER_KEY_INFO: &[u8] = b"passvault-verifier-key";
const VERIFIER_CONTEXT: &[u8] = b"passvault-verifier-v1";

/// The symmetric key that seals the vault body.
///
/// Zeroed when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WorkingKey {
    bytes: [u8; KEY_LEN],
}

impl WorkingKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to AES-GCM).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for WorkingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WorkingKey([REDACTED])")
    }
}

/// Everything a master key derives to for one salt.
#[derive(Clone)]
pub struct KeyMaterial {
    pub working_key: WorkingKey,
    pub verifier: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// Constant-time check of this material against a stored verifier.
    pub fn matches(&self, stored_verifier: &[u8]) -> bool {
        self.verifier.as_slice().ct_eq(stored_verifier).into()
    }
}

/// Derive the working key and verifier for `master_key` under `salt`.
pub fn derive(master_key: &str, salt: &[u8], params: &Argon2Params) -> Result<KeyMaterial> {
    let mut root = stretch(master_key.as_bytes(), salt, params)?;
    let material = expand(&root);
    root.zeroize();
    material
}

/// Recompute the verifier for `master_key` and compare in constant time.
///
/// A mismatch is `false`, never an error.  Derivation failures (which can
/// only come from unusable parameters) also count as a mismatch.
pub fn verify(master_key: &str, salt: &[u8], params: &Argon2Params, stored_verifier: &[u8]) -> bool {
    derive(master_key, salt, params)
        .map(|m| m.matches(stored_verifier))
        .unwrap_or(false)
}

fn expand(root: &[u8; KEY_LEN]) -> Result<KeyMaterial> {
    // The root already has full entropy from Argon2id, so no extract salt.
    let hk = Hkdf::<Sha256>::new(None, root);

    let mut working = [0u8; KEY_LEN];
    hk.expand(WORKING_KEY_INFO, &mut working)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    let mut verifier_key = [0u8; KEY_LEN];
    hk.expand(VERIFIER_KEY_INFO, &mut verifier_key)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&verifier_key)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("HMAC init failed: {e}")))?;
    verifier_key.zeroize();
    mac.update(VERIFIER_CONTEXT);

    let mut verifier = [0u8; KEY_LEN];
    verifier.copy_from_slice(&mac.finalize().into_bytes());

    let material = KeyMaterial {
        working_key: WorkingKey::new(working),
        verifier,
    };
    working.zeroize();
    Ok(material)
}
