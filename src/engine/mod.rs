//! File discovery, scope selection, and the concurrent rule-dispatch
//! scheduler (C6, §4.6).
//!
//! Discovery is a single-threaded `WalkDir` pass producing a bounded, sorted
//! file list. Dispatch runs on a sized `rayon` thread pool: the per-file
//! work is parallel, but rule invocations for the same file stay sequential
//! so the `FileModel` is read once per file (§5).

mod plugins;

pub use plugins::{PluginRule, PluginRuleDef, load_plugins};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::adapters::{self, is_generated_file};
use crate::conformance::ProjectContext;
use crate::error::StrictureError;
use crate::model::{FileModel, Severity, Violation};
use crate::rules::{Registry, RuleConfig};

/// VCS scope for a run (§4.6, §6: `--changed`/`--staged`, mutually exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Changed,
    Staged,
}

/// Result of the discovery walk: the sorted, deduplicated file list plus a
/// count of entries dropped (escaping symlinks, walk errors).
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Walk `paths` (relative to `root`; empty means "the whole root") and
/// return project-relative, `/`-separated file paths, excluding generated
/// and vendor paths, symlinks resolving outside `root`, and anything not
/// matching `extensions` (normalized lowercase, no leading dot; empty means
/// no filter) (§4.6).
pub fn discover_files(root: &Path, paths: &[PathBuf], extensions: &[String], verbose: bool) -> Result<ScanResult> {
    let root = root.canonicalize().with_context(|| format!("project root not found: {}", root.display()))?;

    let walk_roots: Vec<PathBuf> = if paths.is_empty() {
        vec![root.clone()]
    } else {
        paths.iter().map(|p| root.join(p)).collect()
    };

    let mut files = Vec::new();
    let mut skipped_count = 0;
    let extensions: Vec<String> = extensions.iter().map(|e| normalize_ext(e)).collect();

    for walk_root in walk_roots {
        for entry in WalkDir::new(&walk_root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} cannot access path: {e}", "warning:".bold().yellow());
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() && !entry.path_is_symlink() {
                continue;
            }

            if entry.path_is_symlink() {
                match entry.path().canonicalize() {
                    Ok(resolved) if resolved.starts_with(&root) && resolved.is_file() => {}
                    _ => {
                        skipped_count += 1;
                        continue;
                    }
                }
            } else if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            let normalized = to_posix(relative);

            if is_generated_file(&normalized) {
                continue;
            }
            if !extensions.is_empty() {
                let ext = Path::new(&normalized).extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
                if !ext.is_some_and(|e| extensions.contains(&e)) {
                    continue;
                }
            }

            files.push(normalized);
        }
    }

    files.sort();
    files.dedup();
    Ok(ScanResult { files, skipped_count })
}

fn normalize_ext(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase()
}

fn to_posix(path: &Path) -> String {
    path.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect::<Vec<_>>().join("/")
}

/// Narrow `files` to the VCS scope (§4.6); `Scope::All` is a no-op.
pub fn apply_scope(root: &Path, files: Vec<String>, scope: Scope) -> Result<Vec<String>> {
    let changed = match scope {
        Scope::All => return Ok(files),
        Scope::Changed => crate::vcs::changed_files(root)?,
        Scope::Staged => crate::vcs::staged_files(root)?,
    };
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let scoped: std::collections::HashSet<String> =
        changed.into_iter().filter_map(|p| p.strip_prefix(&root).ok().map(to_posix)).collect();
    Ok(files.into_iter().filter(|f| scoped.contains(f)).collect())
}

/// Resolve `--concurrency`: default `min(available parallelism, 8)`,
/// otherwise the requested value, which must be ≥ 1 (§4.6).
pub fn resolve_concurrency(requested: Option<i64>) -> Result<usize, StrictureError> {
    match requested {
        Some(n) if n < 1 => Err(StrictureError::Config {
            detail: format!("--concurrency must be >= 1, got {n}"),
        }),
        Some(n) => Ok(n as usize),
        None => {
            let available = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
            Ok(available.min(8))
        }
    }
}

/// Read and build a `FileModel` for every discovered path, in parallel.
/// Files that fail to read or look binary are dropped with a diagnostic
/// (never a hard error — a single unreadable file shouldn't fail the run).
pub fn build_file_models(root: &Path, relative_paths: &[String], pool: &rayon::ThreadPool, verbose: bool) -> Vec<FileModel> {
    pool.install(|| {
        relative_paths
            .par_iter()
            .filter_map(|relative| {
                let full_path = root.join(relative);
                let source = match fs::read(&full_path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        if verbose {
                            eprintln!("{} cannot read {relative}: {e}", "warning:".bold().yellow());
                        }
                        return None;
                    }
                };
                match adapters::inspect(relative, source) {
                    Ok(model) => Some(model),
                    Err(e) => {
                        if verbose {
                            eprintln!("{} skipping {relative}: {e}", "warning:".bold().yellow());
                        }
                        None
                    }
                }
            })
            .collect()
    })
}

/// Everything the dispatch stage needs beyond the file list itself.
pub struct RunContext<'a> {
    pub registry: &'a Registry,
    pub rule_ids: &'a [String],
    pub rule_configs: &'a BTreeMap<String, RuleConfig>,
    pub project: Option<&'a ProjectContext>,
}

/// Run every selected rule over every file (§4.6, §5): parallel across
/// files, sequential across rules within one file.
pub fn analyze(files: &[FileModel], ctx: &RunContext, pool: &rayon::ThreadPool) -> Vec<Violation> {
    let manifest_configured = ctx.project.is_some();
    let selected = ctx.registry.select(ctx.rule_ids, ctx.rule_configs, manifest_configured);
    let default_config = RuleConfig::default();

    let per_file: Vec<Vec<Violation>> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                selected
                    .iter()
                    .flat_map(|rule| {
                        let config = ctx.rule_configs.get(rule.meta().id).unwrap_or(&default_config);
                        run_one_rule(*rule, file, ctx.project, config)
                    })
                    .collect()
            })
            .collect()
    });

    per_file.into_iter().flatten().collect()
}

/// A rule panicking must not take down the whole run (§7: the CLI boundary
/// always completes with a report, even when one check is broken).
fn run_one_rule(
    rule: &dyn crate::rules::Rule,
    file: &FileModel,
    project: Option<&ProjectContext>,
    config: &RuleConfig,
) -> Vec<Violation> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| rule.check(file, project, config))) {
        Ok(violations) => violations,
        Err(_) => vec![Violation::new(
            "engine-rule-fault",
            Severity::Error,
            format!("rule '{}' panicked while checking this file", rule.meta().id),
            &file.path,
            1,
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_files_excludes_generated_and_vendor_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("src/app.ts"), "export function f() {}\n").unwrap();
        fs::write(dir.path().join("src/client.pb.go"), "package main\n").unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "module.exports = {};\n").unwrap();

        let result = discover_files(dir.path(), &[], &[], false).unwrap();
        assert_eq!(result.files, vec!["src/app.ts".to_string()]);
    }

    #[test]
    fn discover_files_applies_extension_filter() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.ts"), "export const a = 1;\n").unwrap();
        fs::write(dir.path().join("a.go"), "package main\n").unwrap();

        let result = discover_files(dir.path(), &[], &["ts".to_string()], false).unwrap();
        assert_eq!(result.files, vec!["a.ts".to_string()]);
    }

    #[test]
    fn resolve_concurrency_rejects_zero() {
        assert!(resolve_concurrency(Some(0)).is_err());
    }

    #[test]
    fn resolve_concurrency_accepts_explicit_value() {
        assert_eq!(resolve_concurrency(Some(4)).unwrap(), 4);
    }

    #[test]
    fn build_file_models_skips_binary_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.ts"), "export const a = 1;\n").unwrap();
        let mut binary = vec![0u8; 32];
        binary[4] = 0;
        fs::write(dir.path().join("logo.png"), &binary).unwrap();

        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let models = build_file_models(dir.path(), &["a.ts".to_string(), "logo.png".to_string()], &pool, false);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].path, "a.ts");
    }

    #[test]
    fn analyze_runs_selected_rules_across_files() {
        let registry = Registry::with_builtins();
        let files = vec![FileModel::new("bad.go", crate::model::Language::Go, b"package main\n".to_vec())];
        let ctx = RunContext {
            registry: &registry,
            rule_ids: &[],
            rule_configs: &BTreeMap::new(),
            project: None,
        };
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let violations = analyze(&files, &ctx, &pool);
        assert!(violations.iter().any(|v| v.rule_id == "CONV-file-header"));
    }
}
