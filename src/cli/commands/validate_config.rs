//! `stricture validate-config [PATH]` (§6): load and validate a
//! `.stricture.yml` without running a full analysis.

use std::path::Path;

use anyhow::Result;

use crate::cli::exit_status::ExitStatus;
use crate::config;

pub fn run(root: &Path, explicit_path: Option<&Path>) -> Result<ExitStatus> {
    let load_result = config::load_config(root, explicit_path, false)?;
    if !load_result.from_file {
        println!("no .stricture.yml found; nothing to validate");
        return Ok(ExitStatus::Success);
    }

    for warning in &load_result.warnings {
        eprintln!("warning: {warning}");
    }

    println!(
        "config is valid: {} rule override(s), {} plugin(s){}",
        load_result.config.rules.len(),
        load_result.config.plugins.len(),
        if load_result.config.manifest.is_some() {
            ", manifest configured"
        } else {
            ""
        }
    );
    Ok(ExitStatus::Success)
}
