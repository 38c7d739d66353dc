use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
///
/// The first four variants are the ones a vault caller branches on;
/// everything else is plumbing that surfaces through the same
/// `{error: message}` envelope.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Vault taxonomy ---
    #[error("Wrong master key")]
    WrongMasterKey,

    #[error("No matching password found")]
    NotFound,

    #[error("Vault data is unreadable: {0}")]
    CorruptStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Master key policy ---
    #[error("Master key too weak — strength {score}%, at least {required}% required")]
    WeakMasterKey { score: u8, required: u8 },

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Store errors ---
    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    // --- Request errors ---
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown channel '{0}'")]
    UnknownChannel(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl PassVaultError {
    /// Map low-level decode failures onto the vault taxonomy.
    ///
    /// Once the verifier has accepted the master key, anything that still
    /// refuses to decrypt or parse means the file itself is damaged.
    pub fn into_corrupt(self) -> Self {
        match self {
            Self::DecryptionFailed => {
                Self::CorruptStore("authentication tag mismatch".into())
            }
            Self::InvalidVaultFormat(msg) | Self::SerializationError(msg) => {
                Self::CorruptStore(msg)
            }
            other => other,
        }
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
