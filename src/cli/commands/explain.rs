//! `stricture explain RULE_ID` (§6): print one rule's full detail block.

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::exit_status::ExitStatus;
use crate::config;
use crate::engine;
use crate::rules::Registry;

pub fn run(root: &Path, rule_id: &str, config_path: Option<&Path>, no_config: bool) -> Result<ExitStatus> {
    let load_result = config::load_config(root, config_path, no_config)?;
    let mut registry = Registry::with_builtins();
    for def in engine::load_plugins(root, &load_result.config.plugins)? {
        registry.register(Box::new(engine::PluginRule::new(def)?));
    }

    let Some(rule) = registry.get(rule_id) else {
        bail!("no such rule: {rule_id}");
    };
    let meta = rule.meta();

    println!("{} ({})", meta.id, meta.category);
    println!();
    println!("{}", meta.description);
    println!();
    println!("Rationale: {}", meta.rationale);
    println!("Default severity: {}", meta.default_severity);
    println!("Fixable: {}", if meta.fixable { "yes" } else { "no" });
    println!(
        "Requires a manifest: {}",
        if meta.needs_project_context { "yes" } else { "no" }
    );

    Ok(ExitStatus::Success)
}
