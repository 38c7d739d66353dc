//! `passvault copy`: put a stored password on the clipboard.

use crate::cli::output;
use crate::cli::{prompt_master_key, select_record, Cli, Context};
use crate::errors::{PassVaultError, Result};
use crate::service::Session;

/// Execute the `copy` command.
pub fn execute(cli: &Cli, index: usize) -> Result<()> {
    let ctx = Context::load(cli)?;
    let master_key = prompt_master_key()?;
    let session = Session::new(&master_key);

    let records = ctx.service.try_get_passwords(&session)?;
    let record = select_record(&records, index)?;

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| PassVaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(record.password.clone())
        .map_err(|e| PassVaultError::CommandFailed(format!("clipboard write: {e}")))?;

    ctx.audit("copy", "ok", None);
    output::success(&format!("Copied password for {}", record.label()));

    Ok(())
}
