//! Vault service: the four operations clients call.
//!
//! `VaultService` ties key derivation, the strength policy and the
//! credential store together:
//! - every read or write first proves the session's master key against
//!   the vault's verifier;
//! - writers are serialized behind a `RwLock`, readers share it;
//! - every operation answers with an `Envelope`, never a panic.
//!
//! The first master key used against an empty directory creates the
//! vault; from then on only that key opens it, until `delete_all_passwords`
//! erases vault and verifier together.

pub mod envelope;
pub mod session;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::crypto::kdf::{generate_salt, Argon2Params};
use crate::crypto::keys::{self, WorkingKey};
use crate::errors::{PassVaultError, Result};
use crate::policy;
use crate::vault::{CredentialRecord, CredentialStore, VaultHeader};

pub use envelope::{
    Ack, CreatePasswordRequest, DeletePasswordRequest, Envelope, ErrorBody, GetPasswordsRequest,
};
pub use session::Session;

/// Tunables the service applies to new vaults and incoming master keys.
#[derive(Debug, Clone, Copy)]
pub struct VaultOptions {
    /// KDF cost for newly created vaults.  Existing vaults keep their own.
    pub argon2_params: Argon2Params,
    /// Minimum master-key strength score (0-100).
    pub min_strength: u8,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            argon2_params: Argon2Params::default(),
            min_strength: policy::DEFAULT_MIN_STRENGTH,
        }
    }
}

/// The credential vault.
#[derive(Debug)]
pub struct VaultService {
    store: CredentialStore,
    options: VaultOptions,
    lock: RwLock<()>,
}

impl VaultService {
    pub fn new(store: CredentialStore, options: VaultOptions) -> Self {
        Self {
            store,
            options,
            lock: RwLock::new(()),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Add a record, creating the vault on first use.
    pub fn create_password(
        &self,
        session: &Session,
        website: &str,
        password: &str,
        nickname: Option<&str>,
    ) -> Envelope<Ack> {
        self.try_create_password(session, website, password, nickname)
            .into()
    }

    /// Decrypt and return every record in insertion order.
    pub fn get_passwords(&self, session: &Session) -> Envelope<Vec<CredentialRecord>> {
        self.try_get_passwords(session).into()
    }

    /// Remove every record matching the website + password + nickname triple.
    pub fn delete_password(
        &self,
        session: &Session,
        website: &str,
        password: &str,
        nickname: Option<&str>,
    ) -> Envelope<Ack> {
        self.try_delete_password(session, website, password, nickname)
            .map(Ack::removed)
            .into()
    }

    /// Erase the vault and its verifier.  Needs no master key.
    pub fn delete_all_passwords(&self) -> Envelope<Ack> {
        let _guard = self.write_lock();
        self.store.clear().map(|()| Ack::ok()).into()
    }

    // ------------------------------------------------------------------
    // Result-returning forms, for callers that want typed errors
    // ------------------------------------------------------------------

    pub fn try_create_password(
        &self,
        session: &Session,
        website: &str,
        password: &str,
        nickname: Option<&str>,
    ) -> Result<Ack> {
        policy::enforce(session.master_key(), self.options.min_strength)?;
        let record = CredentialRecord::new(website, password, nickname)?;

        let _guard = self.write_lock();
        let key = self.unlock_or_create(session)?;
        let count = self
            .store
            .append(&key, record)
            .map_err(PassVaultError::into_corrupt)?;

        info!(count, "password created");
        Ok(Ack::ok())
    }

    pub fn try_get_passwords(&self, session: &Session) -> Result<Vec<CredentialRecord>> {
        policy::enforce(session.master_key(), self.options.min_strength)?;

        {
            let _guard = self.read_lock();
            if let Some(header) = self.store.read_header()? {
                let key = session.unlock(&header)?;
                return self.load(&key);
            }
        }

        // No vault yet: take the write side and create one for this key.
        let _guard = self.write_lock();
        let key = self.unlock_or_create(session)?;
        self.load(&key)
    }

    pub fn try_delete_password(
        &self,
        session: &Session,
        website: &str,
        password: &str,
        nickname: Option<&str>,
    ) -> Result<usize> {
        let _guard = self.write_lock();
        let header = self.store.read_header()?.ok_or(PassVaultError::NotFound)?;
        let key = session.unlock(&header)?;

        let removed = self
            .store
            .remove_matching(&key, |r| r.matches(website, password, nickname))
            .map_err(PassVaultError::into_corrupt)?;

        info!(removed, "password deleted");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn load(&self, key: &WorkingKey) -> Result<Vec<CredentialRecord>> {
        let records = self
            .store
            .load_all(key)
            .map_err(PassVaultError::into_corrupt)?;
        debug!(count = records.len(), "passwords loaded");
        Ok(records)
    }

    /// Caller must hold the write lock.
    fn unlock_or_create(&self, session: &Session) -> Result<WorkingKey> {
        if let Some(header) = self.store.read_header()? {
            return session.unlock(&header);
        }

        let salt = generate_salt();
        let params = self.options.argon2_params;
        let material = keys::derive(session.master_key(), &salt, &params)?;
        let header = VaultHeader::new(&salt, params, &material.verifier);

        self.store.initialize(&header, &material.working_key)?;
        let key = material.working_key.clone();
        session.remember(&header, material);

        info!(path = %self.store.path().display(), "new vault created for session");
        Ok(key)
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, ()> {
        // The lock guards no data, so a poisoned lock is still usable.
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }
}
