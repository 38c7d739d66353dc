//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::service::VaultService;
use crate::vault::{CredentialRecord, CredentialStore};

/// Environment variable consulted before prompting for the master key.
pub const MASTER_KEY_ENV: &str = "PASSVAULT_MASTER_KEY";

/// PassVault CLI: encrypted password vault.
#[derive(Parser)]
#[command(name = "passvault", about = "Encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: from .passvault.toml, else .passvault)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a password for a website
    Add {
        /// Website the password belongs to (e.g. example.com)
        website: String,
        /// Optional nickname to tell accounts apart (e.g. work)
        #[arg(short, long)]
        nickname: Option<String>,
        /// Generate a random password instead of prompting for one
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password (default: from config, else 24)
        #[arg(long, requires = "generate")]
        length: Option<usize>,
    },

    /// List all stored passwords
    List {
        /// Print passwords in clear instead of masking them
        #[arg(long)]
        show: bool,
    },

    /// Delete a stored password by its number in `list`
    Delete {
        /// Entry number as shown by `list` (1-based)
        index: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete every stored password and the master key verifier
    Wipe {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Copy a stored password to the clipboard
    Copy {
        /// Entry number as shown by `list` (1-based)
        index: usize,
    },

    /// Print a random password
    Generate {
        /// Password length (default: from config, else 24)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Rate a master key without touching the vault
    Strength,

    /// Answer vault calls as line-delimited JSON on stdin/stdout
    Serve,

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs to reach the vault.
pub struct Context {
    pub settings: Settings,
    pub vault_dir: PathBuf,
    pub service: VaultService,
}

impl Context {
    /// Load `.passvault.toml` from the working directory and build the service.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut settings = Settings::load(&cwd)?;
        if let Some(dir) = &cli.vault_dir {
            settings.vault_dir = dir.clone();
        }

        let vault_dir = cwd.join(&settings.vault_dir);
        let store = CredentialStore::new(settings.vault_path(&cwd));
        let service = VaultService::new(store, settings.vault_options());

        Ok(Self {
            settings,
            vault_dir,
            service,
        })
    }

    /// Record an operation in the audit log, if the vault directory exists.
    pub fn audit(&self, op: &str, outcome: &str, details: Option<&str>) {
        if self.vault_dir.is_dir() {
            crate::audit::log_audit(&self.vault_dir, op, outcome, details);
        }
    }
}

/// Get the master key, trying in order:
/// 1. `PASSVAULT_MASTER_KEY` env var (scripts, CI)
/// 2. Interactive hidden prompt
///
/// Returns `Zeroizing<String>` so the key is wiped from memory on drop.
pub fn prompt_master_key() -> Result<Zeroizing<String>> {
    if let Ok(key) = std::env::var(MASTER_KEY_ENV) {
        if !key.is_empty() {
            return Ok(Zeroizing::new(key));
        }
    }

    let key = dialoguer::Password::new()
        .with_prompt("Enter master key")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("master key prompt: {e}")))?;
    Ok(Zeroizing::new(key))
}

/// Pick the record numbered `index` (1-based, as printed by `list`).
pub fn select_record(records: &[CredentialRecord], index: usize) -> Result<&CredentialRecord> {
    index
        .checked_sub(1)
        .and_then(|i| records.get(i))
        .ok_or_else(|| {
            PassVaultError::CommandFailed(format!(
                "no entry #{index} — the vault holds {} password(s)",
                records.len()
            ))
        })
}
