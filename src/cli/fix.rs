//! `--fix` / `--fix-dry-run` / `--fix-backup` (§6): apply a rule's
//! `suggested_fix` text in place of the original token the violation's
//! message quotes.
//!
//! Fixes are textual, not structural: `Violation` carries a replacement
//! string, not a byte span, so applying one means finding the original token
//! on the violation's line and substituting it. Every fixable rule quotes
//! the token it is unhappy with somewhere in its message (export-naming:
//! `'DoThing'`, error-format: `"bad request: %v"`), so the first quoted span
//! on the line is always the thing to replace.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

use crate::model::Violation;

static QUOTED_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['"]([^'"]*)['"]"#).unwrap());

#[derive(Debug, Default)]
pub struct FixSummary {
    pub files_changed: usize,
    pub fixes_applied: usize,
    pub fixes_skipped: usize,
}

/// One planned edit, surfaced so `--fix-dry-run` can print it without
/// touching disk.
pub struct PlannedFix {
    pub file_path: String,
    pub line: usize,
    pub original: String,
    pub replacement: String,
}

fn plan_fixes(violations: &[Violation]) -> Vec<PlannedFix> {
    violations
        .iter()
        .filter_map(|v| {
            let fix = v.context.as_ref()?.suggested_fix.as_ref()?;
            Some(PlannedFix {
                file_path: v.file_path.clone(),
                line: v.start_line,
                original: extract_original_token(&v.message)?,
                replacement: fix.clone(),
            })
        })
        .collect()
}

fn extract_original_token(message: &str) -> Option<String> {
    QUOTED_SPAN.captures(message).map(|c| c[1].to_string())
}

/// Plan every fixable violation's edit without writing anything; used for
/// `--fix-dry-run` reporting.
pub fn dry_run(violations: &[Violation]) -> Vec<PlannedFix> {
    plan_fixes(violations)
}

/// Apply every fixable violation's edit to disk, grouping by file so each
/// file is read and written exactly once. When `backup` is set, a `.bak`
/// copy of the original content is written first and refused if one already
/// exists (§6: "fails if `.bak` already exists").
pub fn apply(root: &Path, violations: &[Violation], backup: bool) -> Result<FixSummary> {
    let planned = plan_fixes(violations);
    let mut by_file: BTreeMap<String, Vec<&PlannedFix>> = BTreeMap::new();
    for fix in &planned {
        by_file.entry(fix.file_path.clone()).or_default().push(fix);
    }

    let mut summary = FixSummary::default();

    for (relative, fixes) in by_file {
        let full_path = root.join(&relative);
        let content = fs::read_to_string(&full_path).with_context(|| format!("reading {relative} to apply fixes"))?;

        if backup {
            let mut backup_name = full_path.file_name().and_then(|n| n.to_str()).unwrap_or("file").to_string();
            backup_name.push_str(".bak");
            let backup_path = full_path.with_file_name(backup_name);
            if backup_path.exists() {
                bail!("backup file {} already exists; refusing to overwrite", backup_path.display());
            }
            fs::write(&backup_path, &content).with_context(|| format!("writing backup {}", backup_path.display()))?;
        }

        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        let mut changed = false;

        for fix in fixes {
            let Some(line) = lines.get_mut(fix.line.saturating_sub(1)) else {
                summary.fixes_skipped += 1;
                continue;
            };
            if let Some(pos) = line.find(&fix.original) {
                line.replace_range(pos..pos + fix.original.len(), &fix.replacement);
                summary.fixes_applied += 1;
                changed = true;
            } else {
                summary.fixes_skipped += 1;
            }
        }

        if changed {
            let mut rendered = lines.join("\n");
            if content.ends_with('\n') {
                rendered.push('\n');
            }
            fs::write(&full_path, rendered).with_context(|| format!("writing fixed {relative}"))?;
            summary.files_changed += 1;
        }
    }

    Ok(summary)
}
