//! Terminal presentation adapter: renders aggregate views and forwards user
//! actions to the ledger. The core never touches the terminal directly.

pub mod commands;
pub mod output;
pub mod shell;

pub use shell::{run, CliMode, CommandError, ShellContext};
