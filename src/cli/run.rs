//! Top-level dispatch (§6): route parsed `Arguments` to the default analyze
//! action or a `Command` variant, and fold the result into an `ExitStatus`.

use std::env;

use anyhow::Result;

use crate::cli::args::{Arguments, Command};
use crate::cli::commands::{analyze, explain, init, inspect, list_rules, trace, validate_config};
use crate::cli::exit_status::ExitStatus;

pub fn run(args: Arguments) -> Result<ExitStatus> {
    let root = env::current_dir()?;

    match args.command {
        None => Ok(analyze::run(&root, &args.paths, &args.common)?.status),
        Some(Command::Audit { common }) => Ok(analyze::run(&root, &args.paths, &common)?.status),
        Some(Command::Inspect { path }) => inspect::run(&path),
        Some(Command::ListRules) => list_rules::run(&root, args.common.config.as_deref(), args.common.no_config),
        Some(Command::Explain { rule_id }) => {
            explain::run(&root, &rule_id, args.common.config.as_deref(), args.common.no_config)
        }
        Some(Command::Init { force }) => init::run(&root, force),
        Some(Command::ValidateConfig { path }) => validate_config::run(&root, Some(&path)),
        Some(Command::Trace { file, trace_format, manifest }) => {
            trace::run(&root, &file, trace_format.as_deref(), manifest.as_ref())
        }
    }
}
