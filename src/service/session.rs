//! Per-session master-key state.
//!
//! A `Session` is the only place a master key lives.  It is created from
//! whatever the user typed, passed by reference into every vault call,
//! and wiped when dropped.  It also remembers the key material it last
//! derived (tagged with the salt and params it was derived under), so a
//! session pays for Argon2id once per vault rather than once per call.

use std::sync::{Mutex, PoisonError};

use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto::kdf::Argon2Params;
use crate::crypto::keys::{self, KeyMaterial, WorkingKey};
use crate::errors::{PassVaultError, Result};
use crate::vault::VaultHeader;

struct CachedKeys {
    salt: Vec<u8>,
    params: Argon2Params,
    material: KeyMaterial,
}

/// One user's master key for the lifetime of an unlocked session.
pub struct Session {
    master_key: Zeroizing<String>,
    cache: Mutex<Option<CachedKeys>>,
}

impl Session {
    /// Start a session for `master_key`.
    pub fn new(master_key: &str) -> Self {
        Self {
            master_key: Zeroizing::new(master_key.to_string()),
            cache: Mutex::new(None),
        }
    }

    /// The master key as typed.
    pub(crate) fn master_key(&self) -> &str {
        &self.master_key
    }

    /// Constant-time check that this session was opened with `master_key`.
    pub fn is_for(&self, master_key: &str) -> bool {
        self.master_key.as_bytes().ct_eq(master_key.as_bytes()).into()
    }

    /// Check this session's master key against `header` and return the
    /// working key on success.
    ///
    /// The comparison always goes through the header's verifier; a cached
    /// derivation is reused only when salt and params are unchanged.
    pub(crate) fn unlock(&self, header: &VaultHeader) -> Result<WorkingKey> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        let material = match cache.take() {
            Some(c) if c.salt == header.salt && c.params == header.argon2_params => c.material,
            _ => {
                debug!("deriving key material for session");
                keys::derive(&self.master_key, &header.salt, &header.argon2_params)
                    .map_err(|e| PassVaultError::CorruptStore(format!("vault header: {e}")))?
            }
        };

        if !material.matches(&header.verifier) {
            warn!("master key rejected by verifier");
            return Err(PassVaultError::WrongMasterKey);
        }

        let key = material.working_key.clone();
        *cache = Some(CachedKeys {
            salt: header.salt.clone(),
            params: header.argon2_params,
            material,
        });
        Ok(key)
    }

    /// Record material derived while creating a vault for this session.
    pub(crate) fn remember(&self, header: &VaultHeader, material: KeyMaterial) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CachedKeys {
            salt: header.salt.clone(),
            params: header.argon2_params,
            material,
        });
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("master_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_MEMORY_KIB;

    fn fast() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn header_for(master_key: &str) -> VaultHeader {
        let salt = [4u8; 32];
        let m = keys::derive(master_key, &salt, &fast()).unwrap();
        VaultHeader::new(&salt, fast(), &m.verifier)
    }

    #[test]
    fn unlock_with_right_key() {
        let header = header_for("Tr0ub4dor&3zz");
        let session = Session::new("Tr0ub4dor&3zz");
        let first = session.unlock(&header).unwrap();
        let second = session.unlock(&header).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn unlock_with_wrong_key() {
        let header = header_for("Tr0ub4dor&3zz");
        let session = Session::new("correct horse");
        assert!(matches!(
            session.unlock(&header),
            Err(PassVaultError::WrongMasterKey)
        ));
    }

    #[test]
    fn cached_material_does_not_bypass_a_new_verifier() {
        let session = Session::new("Tr0ub4dor&3zz");
        let header = header_for("Tr0ub4dor&3zz");
        session.unlock(&header).unwrap();

        // Same salt and params, different verifier: must still be rejected.
        let mut other = header.clone();
        other.verifier = vec![0u8; 32];
        assert!(session.unlock(&other).is_err());
    }

    #[test]
    fn is_for_compares_master_keys() {
        let session = Session::new("Tr0ub4dor&3zz");
        assert!(session.is_for("Tr0ub4dor&3zz"));
        assert!(!session.is_for("Tr0ub4dor&3z"));
    }

    #[test]
    fn debug_redacts_master_key() {
        let session = Session::new("Tr0ub4dor&3zz");
        assert!(!format!("{session:?}").contains("Tr0ub4dor"));
    }
}
