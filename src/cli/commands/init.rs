//! `stricture init` (§6): write a starter `.stricture.yml`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::exit_status::ExitStatus;
use crate::config;

pub fn run(root: &Path, force: bool) -> Result<ExitStatus> {
    let path = root.join(config::CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!("{} already exists (pass --force to overwrite)", path.display());
    }

    fs::write(&path, config::default_config_yaml()).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(ExitStatus::Success)
}
