//! `passvault strength`: rate a master key.

use crate::cli::output;
use crate::cli::{prompt_master_key, Cli, Context};
use crate::errors::Result;
use crate::policy;

/// Execute the `strength` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let master_key = prompt_master_key()?;

    let report = policy::report(&master_key);
    output::print_strength_report(&report);

    let required = ctx.settings.min_master_key_strength;
    if report.score >= required {
        output::success(&format!("Accepted (minimum is {required}%)"));
    } else {
        output::warning(&format!("Too weak: the vault requires at least {required}%"));
    }

    Ok(())
}
