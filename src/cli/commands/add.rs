//! `passvault add`: store a password for a website.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{prompt_master_key, Cli, Context};
use crate::crypto::generate_password;
use crate::errors::{PassVaultError, Result};
use crate::service::Session;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    website: &str,
    nickname: Option<&str>,
    generate: bool,
    length: Option<usize>,
) -> Result<()> {
    let ctx = Context::load(cli)?;

    // The password comes from one of three sources.
    let password = if generate {
        generate_password(length.unwrap_or(ctx.settings.generated_length))?
    } else if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(strip_line_ending(&buf).to_string())
    } else {
        let value = dialoguer::Password::new()
            .with_prompt(format!("Password for {website}"))
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(value)
    };

    let master_key = prompt_master_key()?;
    let session = Session::new(&master_key);

    let result = ctx
        .service
        .try_create_password(&session, website, &password, nickname);
    match &result {
        Ok(_) => ctx.audit("add", "ok", None),
        Err(e) => ctx.audit("add", "error", Some(&e.to_string())),
    }
    result?;

    let label = match nickname.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => format!("{website} ({n})"),
        None => website.to_string(),
    };
    output::success(&format!("Saved password for {label}"));
    if generate {
        output::tip("Run `passvault list --show` or `passvault copy <N>` to retrieve it.");
    }

    Ok(())
}

/// Drop the single line ending a shell pipe appends; keep other whitespace.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_ending_keeps_trailing_spaces() {
        assert_eq!(strip_line_ending("pass word  \n"), "pass word  ");
        assert_eq!(strip_line_ending("pass\t\r\n"), "pass\t");
        assert_eq!(strip_line_ending("pw\n\n"), "pw\n");
        assert_eq!(strip_line_ending("pw"), "pw");
    }
}
