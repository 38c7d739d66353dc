//! `passvault delete`: remove a stored password.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{prompt_master_key, select_record, Cli, Context};
use crate::errors::{PassVaultError, Result};
use crate::service::Session;

/// Execute the `delete` command.
///
/// The entry is picked by its number in `list`; every record identical
/// to it (same website, password and nickname) is removed.
pub fn execute(cli: &Cli, index: usize, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let master_key = prompt_master_key()?;
    let session = Session::new(&master_key);

    let records = ctx.service.try_get_passwords(&session)?;
    let target = select_record(&records, index)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete password for {}?", target.label()))
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let result = ctx.service.try_delete_password(
        &session,
        &target.website,
        &target.password,
        target.nickname.as_deref(),
    );
    match &result {
        Ok(n) => ctx.audit("delete", "ok", Some(&format!("{n} removed"))),
        Err(e) => ctx.audit("delete", "error", Some(&e.to_string())),
    }
    let removed = result?;

    if removed > 1 {
        output::success(&format!(
            "Deleted {removed} identical entries for {}",
            target.label()
        ));
    } else {
        output::success(&format!("Deleted password for {}", target.label()));
    }

    Ok(())
}
