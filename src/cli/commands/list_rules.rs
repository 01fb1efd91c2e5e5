//! `stricture list-rules` (§6): tabular metadata for every built-in rule,
//! plus any plugin rules the project config declares.

use std::path::Path;

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use crate::cli::exit_status::ExitStatus;
use crate::config;
use crate::engine;
use crate::rules::Registry;

const ID_COLUMN: usize = 28;

/// Pad `s` to `width` display columns. Plugin rule ids and categories come
/// straight out of project-authored YAML, so padding by byte/char count
/// (as a plain `{:<28}` would) misaligns the table once one contains a
/// wide or combining character; `UnicodeWidthStr` measures what a terminal
/// actually renders.
fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    out.push_str(&" ".repeat(width.saturating_sub(w)));
    out
}

pub fn run(root: &Path, config_path: Option<&Path>, no_config: bool) -> Result<ExitStatus> {
    let load_result = config::load_config(root, config_path, no_config)?;
    let mut registry = Registry::with_builtins();
    for def in engine::load_plugins(root, &load_result.config.plugins)? {
        registry.register(Box::new(engine::PluginRule::new(def)?));
    }

    let mut rules: Vec<_> = registry.all().collect();
    rules.sort_by_key(|r| r.meta().id);

    for rule in rules {
        let meta = rule.meta();
        println!(
            "{} {:<8} {:<8} {:<8} {}",
            pad(meta.id, ID_COLUMN),
            meta.category,
            meta.default_severity,
            if meta.fixable { "fixable" } else { "-" },
            meta.description
        );
    }

    Ok(ExitStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_accounts_for_display_width_not_byte_length() {
        let padded = pad("宽度", 6);
        assert_eq!(UnicodeWidthStr::width(padded.as_str()), 6.max(UnicodeWidthStr::width("宽度")));
    }

    #[test]
    fn pad_leaves_short_ascii_ids_with_trailing_spaces() {
        assert_eq!(pad("CONV-x", 8), "CONV-x  ");
    }
}
