//! Binary vault file format.
//!
//! A vault file has this layout:
//!
//! ```text
//! [PWVT: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][sealed body]
//! ```
//!
//! - **Magic** (`PWVT`): identifies the file as a PassVault vault.
//! - **Version**: format version (currently `1`).
//! - **Header length**: little-endian u32 telling us where the header
//!   JSON ends and the sealed body begins.
//! - **Header JSON**: serialized `VaultHeader` (salt, KDF params,
//!   verifier).  Readable without any key.
//! - **Sealed body**: nonce || AES-256-GCM(records JSON) with the exact
//!   header JSON bytes as associated data.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::record::CredentialRecord;
use crate::crypto::encryption::{open, seal, NONCE_LEN, TAG_LEN};
use crate::crypto::kdf::Argon2Params;
use crate::crypto::keys::WorkingKey;
use crate::errors::{PassVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"PWVT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Cleartext metadata stored at the beginning of a vault file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,

    /// The salt used for Argon2id (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// Argon2 params used at creation, so unlock uses the same.
    pub argon2_params: Argon2Params,

    /// MAC proving knowledge of the master key (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub verifier: Vec<u8>,
}

impl VaultHeader {
    /// Build a header for a brand-new vault.
    pub fn new(salt: &[u8], argon2_params: Argon2Params, verifier: &[u8]) -> Self {
        Self {
            version: CURRENT_VERSION,
            salt: salt.to_vec(),
            created_at: Utc::now(),
            argon2_params,
            verifier: verifier.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Raw data read from a vault file on disk.
///
/// Keeps the header bytes exactly as stored, since they are the
/// associated data the body was sealed with.
#[derive(Debug)]
pub struct RawVault {
    pub header: VaultHeader,
    pub header_bytes: Vec<u8>,
    pub body: Vec<u8>,
}

impl RawVault {
    /// Decrypt and parse the body with `key`.
    ///
    /// Fails as a whole: either every record comes back or none do.
    pub fn decrypt_records(&self, key: &WorkingKey) -> Result<Vec<CredentialRecord>> {
        let plaintext = Zeroizing::new(open(key.as_bytes(), &self.body, &self.header_bytes)?);
        serde_json::from_slice(&plaintext)
            .map_err(|e| PassVaultError::InvalidVaultFormat(format!("records JSON: {e}")))
    }
}

/// Serialize and seal `records`, then write the vault file **atomically**.
///
/// 1. Serialize header and records to JSON.
/// 2. Seal records with a fresh nonce, header bytes as associated data.
/// 3. Write to a temp file in the same directory and fsync it.
/// 4. Rename the temp file over the target path.
///
/// Readers see either the old file or the new one, never a mix.
pub fn write_vault(
    path: &Path,
    header: &VaultHeader,
    records: &[CredentialRecord],
    key: &WorkingKey,
) -> Result<()> {
    let header_bytes = serde_json::to_vec(header)
        .map_err(|e| PassVaultError::SerializationError(format!("header: {e}")))?;
    let records_json = Zeroizing::new(
        serde_json::to_vec(records)
            .map_err(|e| PassVaultError::SerializationError(format!("records: {e}")))?,
    );

    let body = seal(key.as_bytes(), &records_json, &header_bytes)?;

    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        PassVaultError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;

    let mut buf = Vec::with_capacity(PREFIX_LEN + header_bytes.len() + body.len());
    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(&header_bytes); // header JSON
    buf.extend_from_slice(&body); // nonce || ciphertext || tag

    let tmp_path = temp_path(path);
    let written = write_synced(&tmp_path, &buf).and_then(|()| {
        fs::rename(&tmp_path, path)?;
        Ok(())
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

/// Read a vault file from disk without decrypting it.
///
/// Returns `Ok(None)` when no vault exists at `path`.
pub fn read_vault(path: &Path) -> Result<Option<RawVault>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if data.len() < PREFIX_LEN + NONCE_LEN + TAG_LEN {
        return Err(PassVaultError::InvalidVaultFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(PassVaultError::InvalidVaultFormat(
            "missing PWVT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(PassVaultError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| PassVaultError::InvalidVaultFormat("bad header length".into()))?,
    );
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        PassVaultError::InvalidVaultFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN + header_len;
    if header_end + NONCE_LEN + TAG_LEN > data.len() {
        return Err(PassVaultError::InvalidVaultFormat(
            "header length exceeds file size".into(),
        ));
    }

    let header_bytes = data[PREFIX_LEN..header_end].to_vec();
    let body = data[header_end..].to_vec();

    let header: VaultHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| PassVaultError::InvalidVaultFormat(format!("header JSON: {e}")))?;

    Ok(Some(RawVault {
        header,
        header_bytes,
        body,
    }))
}

/// Path of the temp file used for atomic writes: `.<name>.tmp` next to `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file: File = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
