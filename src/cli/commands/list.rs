//! `passvault list`: display all stored passwords in a table.

use crate::cli::output;
use crate::cli::{prompt_master_key, Cli, Context};
use crate::errors::Result;
use crate::service::Session;

/// Execute the `list` command.
pub fn execute(cli: &Cli, show: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let master_key = prompt_master_key()?;
    let session = Session::new(&master_key);

    let result = ctx.service.try_get_passwords(&session);
    match &result {
        Ok(records) => ctx.audit("list", "ok", Some(&format!("{} record(s)", records.len()))),
        Err(e) => ctx.audit("list", "error", Some(&e.to_string())),
    }
    let records = result?;

    if !records.is_empty() {
        output::info(&format!("{} password(s)", records.len()));
    }
    output::print_records_table(&records, show);

    Ok(())
}
