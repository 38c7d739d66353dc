//! `passvault generate`: print a random password.

use crate::cli::{Cli, Context};
use crate::crypto::generate_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>) -> Result<()> {
    let ctx = Context::load(cli)?;
    let password = generate_password(length.unwrap_or(ctx.settings.generated_length))?;
    println!("{}", password.as_str());
    Ok(())
}
