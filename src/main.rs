//! Stricture CLI application entry point.

use std::process::ExitCode;

use clap::Parser;
use stricture::cli::Arguments;

fn main() -> ExitCode {
    let args = Arguments::parse();

    match stricture::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            stricture::cli::exit_status::ExitStatus::Error.into()
        }
    }
}
