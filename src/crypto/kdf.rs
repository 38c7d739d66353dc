//! Master-key stretching using Argon2id.
//!
//! Argon2id is a memory-hard KDF, so every guess at a master key costs
//! an attacker the same memory and time it costs us.  Parameters are
//! configurable via `Argon2Params` (loaded from `.passvault.toml` or
//! defaults) and are recorded in the vault header so the same settings
//! are used on every later unlock.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::errors::{PassVaultError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the stretched root key in bytes (256 bits).
pub const ROOT_KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Largest memory cost we will allocate (4 GiB).
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Largest iteration count we will run.
pub const MAX_ITERATIONS: u32 = 64;

/// Largest number of lanes we will use.
pub const MAX_PARALLELISM: u32 = 64;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject settings weak enough to make brute force cheap, or costly
    /// enough to exhaust the machine.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at most {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 iterations must be at most {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if self.parallelism > MAX_PARALLELISM {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be at most {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(PassVaultError::KeyDerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(PassVaultError::KeyDerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Stretch `master_key` into a 32-byte root key.
///
/// The same master key + salt + params always produce the same output.
pub fn stretch(master_key: &[u8], salt: &[u8], params: &Argon2Params) -> Result<[u8; ROOT_KEY_LEN]> {
    params.validate()?;

    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(ROOT_KEY_LEN),
    )
    .map_err(|e| PassVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut root = [0u8; ROOT_KEY_LEN];
    argon2
        .hash_password_into(master_key, salt, &mut root)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(root)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
