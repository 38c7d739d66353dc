use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::generator::DEFAULT_LENGTH;
use crate::errors::{PassVaultError, Result};
use crate::policy::DEFAULT_MIN_STRENGTH;
use crate::service::VaultOptions;

/// Project-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the vault.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the vault inside `vault_dir`.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Minimum master-key strength score, 0-100 (default: 50).
    #[serde(default = "default_min_master_key_strength")]
    pub min_master_key_strength: u8,

    /// Length of generated passwords (default: 24).
    #[serde(default = "default_generated_length")]
    pub generated_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".passvault".to_string()
}

fn default_vault_file() -> String {
    "passwords.pwvault".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_min_master_key_strength() -> u8 {
    DEFAULT_MIN_STRENGTH
}

fn default_generated_length() -> usize {
    DEFAULT_LENGTH
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            min_master_key_strength: default_min_master_key_strength(),
            generated_length: default_generated_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<project_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed or holds unusable values,
    /// an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the vault would refuse later anyway.
    pub fn validate(&self) -> Result<()> {
        self.argon2_params()
            .validate()
            .map_err(|e| PassVaultError::ConfigError(e.to_string()))?;
        if self.min_master_key_strength > 100 {
            return Err(PassVaultError::ConfigError(format!(
                "min_master_key_strength must be 0-100 (got {})",
                self.min_master_key_strength
            )));
        }
        if self.vault_file.is_empty() || self.vault_file.contains(['/', '\\']) {
            return Err(PassVaultError::ConfigError(format!(
                "vault_file '{}' must be a plain file name",
                self.vault_file
            )));
        }
        Ok(())
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `project_dir/.passvault/passwords.pwvault`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(&self.vault_file)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> crate::crypto::kdf::Argon2Params {
        crate::crypto::kdf::Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Options for a `VaultService` built from these settings.
    pub fn vault_options(&self) -> VaultOptions {
        VaultOptions {
            argon2_params: self.argon2_params(),
            min_strength: self.min_master_key_strength,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
