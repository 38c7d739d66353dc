//! `passvault serve`: answer vault calls over stdin/stdout.
//!
//! Each input line is `{"id", "channel", "payload"}`; each output line is
//! `{"id", "response"}`.  Logs go to stderr so stdout stays clean.

use std::io;

use tracing::info;

use crate::cli::{Cli, Context};
use crate::errors::Result;
use crate::ipc;

/// Execute the `serve` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    info!(vault = %ctx.service.store().path().display(), "serving vault");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let answered = ipc::serve(&ctx.service, stdin.lock(), stdout.lock())?;

    ctx.audit("serve", "ok", Some(&format!("{answered} request(s)")));
    Ok(())
}
