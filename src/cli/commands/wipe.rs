//! `passvault wipe`: erase every stored password.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PassVaultError, Result};

/// Execute the `wipe` command.
///
/// Removes the vault file, and with it the master key verifier: the next
/// `add` or `list` may start over with any master key.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;

    if !ctx.service.store().exists() {
        output::info("Vault is already empty.");
        return Ok(());
    }

    if !force {
        output::warning("This permanently deletes every stored password.");
        let confirmed = Confirm::new()
            .with_prompt("Wipe the vault?")
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let envelope = ctx.service.delete_all_passwords();
    if let Some(msg) = envelope.error_message() {
        ctx.audit("wipe", "error", Some(msg));
        return Err(PassVaultError::CommandFailed(msg.to_string()));
    }

    ctx.audit("wipe", "ok", None);
    output::success("Vault wiped");
    output::tip("The next `passvault add` sets a new master key.");

    Ok(())
}
