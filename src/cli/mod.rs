//! The CLI surface (§6): argument definitions, dispatch, and one module per
//! command.

pub mod args;
pub mod commands;
pub mod exit_status;
pub mod fix;
mod run;

use std::process::ExitCode;

use anyhow::Result;

pub use args::Arguments;

/// Parse and run the CLI, folding any error into `ExitStatus::Error` (§7:
/// every operational error exits 2).
pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    match run::run(args) {
        Ok(status) => Ok(status.into()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            Ok(exit_status::ExitStatus::Error.into())
        }
    }
}
