//! One module per subcommand, each exposing an `execute` entry point.

pub mod add;
pub mod audit_cmd;
pub mod completions;
pub mod copy;
pub mod delete;
pub mod generate;
pub mod list;
pub mod serve;
pub mod strength;
pub mod wipe;
