//! `stricture inspect PATH` (§6): print the `FileModel` JSON for one file
//! without running any rules.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::adapters;
use crate::cli::exit_status::ExitStatus;

pub fn run(path: &Path) -> Result<ExitStatus> {
    let source = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let relative = path.display().to_string();
    let model = adapters::inspect(&relative, source)?;
    let rendered = serde_json::to_string_pretty(&model).context("serializing file model")?;
    println!("{rendered}");
    Ok(ExitStatus::Success)
}
