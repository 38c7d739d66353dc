//! On-disk credential store.
//!
//! `CredentialStore` owns one vault file and knows how to turn it into
//! records and back.  It never sees the master key: callers hand it the
//! already-verified `WorkingKey`.  Every mutation is read-modify-write of
//! the whole file through `format::write_vault`, so a failure at any
//! step leaves the previous file in place untouched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::crypto::keys::WorkingKey;
use crate::errors::{PassVaultError, Result};

use super::format::{self, RawVault, VaultHeader};
use super::record::CredentialRecord;

/// Handle to a vault file on disk.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Point a store at `path`.  Nothing is read or created yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the vault file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a vault file currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Read the cleartext header, or `None` if no vault exists.
    pub fn read_header(&self) -> Result<Option<VaultHeader>> {
        Ok(self.read_raw()?.map(|raw| raw.header))
    }

    /// Decrypt every record, in insertion order.
    ///
    /// A missing vault is an empty one.
    pub fn load_all(&self, key: &WorkingKey) -> Result<Vec<CredentialRecord>> {
        match self.read_raw()? {
            Some(raw) => raw.decrypt_records(key),
            None => Ok(Vec::new()),
        }
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Write a new, empty vault described by `header`.
    pub fn initialize(&self, header: &VaultHeader, key: &WorkingKey) -> Result<()> {
        if self.exists() {
            return Err(PassVaultError::VaultAlreadyExists(self.path.clone()));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        format::write_vault(&self.path, header, &[], key)?;
        info!(path = %self.path.display(), "vault initialized");
        Ok(())
    }

    /// Append `record` and persist the whole collection.
    pub fn append(&self, key: &WorkingKey, record: CredentialRecord) -> Result<usize> {
        let raw = self.require_raw()?;
        let mut records = raw.decrypt_records(key)?;
        records.push(record);

        format::write_vault(&self.path, &raw.header, &records, key)?;
        debug!(count = records.len(), "record appended");
        Ok(records.len())
    }

    /// Remove every record for which `predicate` returns `true`.
    ///
    /// Returns how many were removed.  If nothing matches, the file is
    /// not rewritten and `NotFound` is returned.
    pub fn remove_matching<F>(&self, key: &WorkingKey, predicate: F) -> Result<usize>
    where
        F: Fn(&CredentialRecord) -> bool,
    {
        let raw = self.require_raw()?;
        let mut records = raw.decrypt_records(key)?;

        let before = records.len();
        records.retain(|r| !predicate(r));
        let removed = before - records.len();
        if removed == 0 {
            return Err(PassVaultError::NotFound);
        }

        format::write_vault(&self.path, &raw.header, &records, key)?;
        debug!(removed, remaining = records.len(), "records removed");
        Ok(removed)
    }

    /// Erase the vault file, header and verifier included.
    ///
    /// Needs no key.  Clearing an absent vault is not an error.
    pub fn clear(&self) -> Result<()> {
        let tmp = format::temp_path(&self.path);
        if tmp.exists() {
            fs::remove_file(&tmp)?;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "vault erased");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn read_raw(&self) -> Result<Option<RawVault>> {
        format::read_vault(&self.path).map_err(PassVaultError::into_corrupt)
    }

    fn require_raw(&self) -> Result<RawVault> {
        self.read_raw()?.ok_or_else(|| {
            PassVaultError::CorruptStore(format!(
                "vault file disappeared from {}",
                self.path.display()
            ))
        })
    }
}
