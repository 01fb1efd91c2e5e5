//! The core analysis pipeline (§4, §6): wires discovery, the rule engine,
//! conformance, suppression, baseline/diff, severity filtering, fixing, and
//! reporting together. Shared by the default (no-subcommand) action and
//! `stricture audit`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::args::CommonArgs;
use crate::cli::exit_status::ExitStatus;
use crate::cli::fix;
use crate::conformance::{ContractBinding, ProjectContext};
use crate::engine::{self, RunContext, Scope};
use crate::error::StrictureError;
use crate::manifest::{self, ServiceRole};
use crate::model::{RunReport, Severity};
use crate::rules::{Registry, RuleConfig};
use crate::{baseline, config, filter, reporter, suppression};

/// Flag combinations the CLI rejects before doing any work (§6, §7: each is
/// a configuration error, exit 2).
fn validate_flags(common: &CommonArgs) -> Result<(), StrictureError> {
    if common.severity.is_some() && common.quiet {
        return Err(StrictureError::Config {
            detail: "--severity conflicts with --quiet".to_string(),
        });
    }
    if common.color && common.no_color {
        return Err(StrictureError::Config {
            detail: "--color conflicts with --no-color".to_string(),
        });
    }
    if common.changed && common.staged {
        return Err(StrictureError::Config {
            detail: "--changed conflicts with --staged".to_string(),
        });
    }
    if common.fix_backup && !common.fix {
        return Err(StrictureError::Config {
            detail: "--fix-backup requires --fix".to_string(),
        });
    }
    Ok(())
}

fn severity_floor(common: &CommonArgs) -> Result<Option<Severity>, StrictureError> {
    if common.quiet {
        return Ok(Some(Severity::Error));
    }
    match &common.severity {
        Some(raw) => Severity::parse(raw).map(Some).ok_or_else(|| StrictureError::Config {
            detail: format!("unknown --severity value '{raw}' (expected warn or error)"),
        }),
        None => Ok(None),
    }
}

fn resolve_scope(common: &CommonArgs) -> Scope {
    if common.changed {
        Scope::Changed
    } else if common.staged {
        Scope::Staged
    } else {
        Scope::All
    }
}

fn build_project_context(
    root: &Path,
    manifest_config: &config::ManifestConfig,
    manifest_override: Option<&Path>,
    files: &[crate::model::FileModel],
) -> Result<ProjectContext> {
    let manifest_path = manifest_override
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| root.join(manifest_config.path.as_deref().or(manifest_config.url.as_deref()).unwrap_or_default()));

    let source = std::fs::read_to_string(&manifest_path).map_err(|source| StrictureError::Io {
        path: manifest_path.display().to_string(),
        source,
    })?;
    let (manifest, _warnings) = manifest::load_manifest(&manifest_path.display().to_string(), &source)?;

    let bindings = manifest_config
        .contracts
        .iter()
        .map(|entry| {
            let role = ServiceRole::parse(&entry.role).ok_or_else(|| StrictureError::Config {
                detail: format!("unknown contract role '{}' for contract '{}'", entry.role, entry.id),
            })?;
            Ok(ContractBinding {
                contract_id: entry.id.clone(),
                role,
                handler_paths: entry.handler_paths.clone(),
                type_paths: entry.type_paths.clone(),
                enum_strict_subset: entry.enum_strict_subset,
            })
        })
        .collect::<Result<Vec<_>, StrictureError>>()?;

    Ok(ProjectContext::build(manifest, manifest_config.service.clone(), bindings, files))
}

pub struct AnalyzeOutcome {
    pub status: ExitStatus,
}

pub fn run(root: &Path, paths: &[PathBuf], common: &CommonArgs) -> Result<AnalyzeOutcome> {
    let start = Instant::now();
    validate_flags(common)?;
    let floor = severity_floor(common)?;

    let load_result = config::load_config(root, common.config.as_deref(), common.no_config)?;
    if common.verbose {
        for warning in &load_result.warnings {
            eprintln!("warning: {warning}");
        }
    }
    let project_config = load_result.config;

    let extensions = common.extensions.clone();
    let scan = engine::discover_files(root, paths, &extensions, common.verbose)?;
    let scoped = engine::apply_scope(root, scan.files, resolve_scope(common))?;

    let concurrency = engine::resolve_concurrency(common.concurrency)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .build()
        .context("failed to build the worker thread pool")?;

    let files = engine::build_file_models(root, &scoped, &pool, common.verbose);

    let mut registry = Registry::with_builtins();

    let plugin_defs = engine::load_plugins(root, &project_config.plugins)?;
    for def in plugin_defs {
        registry.register(Box::new(engine::PluginRule::new(def)?));
    }

    let manifest_path_override = common.manifest.as_deref();
    let project = match (&project_config.manifest, manifest_path_override) {
        (Some(manifest_config), _) => Some(build_project_context(root, manifest_config, manifest_path_override, &files)?),
        (None, Some(explicit)) => {
            return Err(StrictureError::Config {
                detail: format!(
                    "--manifest {} was given but no 'manifest.service' is configured in .stricture.yml",
                    explicit.display()
                ),
            }
            .into());
        }
        (None, None) => None,
    };

    if project.is_some() {
        ProjectContext::register(&mut registry);
    }

    let mut rule_configs: BTreeMap<String, RuleConfig> = BTreeMap::new();
    for (id, entry) in &project_config.rules {
        rule_configs.insert(id.clone(), entry.to_rule_config()?);
    }

    let ctx = RunContext {
        registry: &registry,
        rule_ids: &common.rules,
        rule_configs: &rule_configs,
        project: project.as_ref(),
    };
    let mut violations = engine::analyze(&files, &ctx, &pool);
    if let Some(project) = &project {
        violations.extend(manifest::check_manifest_strictness(&project.manifest));
    }

    let files_by_path: BTreeMap<&str, &crate::model::FileModel> = files.iter().map(|f| (f.path.as_str(), f)).collect();
    let mut grouped: BTreeMap<String, Vec<crate::model::Violation>> = BTreeMap::new();
    for violation in violations {
        grouped.entry(violation.file_path.clone()).or_default().push(violation);
    }
    let mut suppressed = Vec::new();
    for (path, group) in grouped {
        match files_by_path.get(path.as_str()) {
            Some(file) => suppressed.extend(suppression::apply(file, group)),
            None => suppressed.extend(group),
        }
    }

    if common.fix_dry_run {
        for planned in fix::dry_run(&suppressed) {
            println!("{}:{}  '{}' -> '{}'", planned.file_path, planned.line, planned.original, planned.replacement);
        }
    } else if common.fix {
        let summary = fix::apply(root, &suppressed, common.fix_backup)?;
        eprintln!(
            "stricture: applied {} fix(es) across {} file(s), {} skipped",
            summary.fixes_applied, summary.files_changed, summary.fixes_skipped
        );
    }

    let mut violations = suppressed;

    let mut diff_payload = None;
    if let Some(baseline_path) = &common.baseline {
        match baseline::load(baseline_path)? {
            Some(existing) => {
                if common.diff {
                    diff_payload = Some(baseline::diff(&violations, &existing));
                } else {
                    violations = baseline::filter_baselined(violations, &existing);
                }
            }
            None => {
                baseline::bootstrap(baseline_path, &violations)?;
                violations.clear();
            }
        }
    }

    if let Some(floor) = floor {
        violations = filter::apply_severity_floor(violations, floor);
    }
    reporter::sort_violations(&mut violations);
    violations = filter::apply_max_violations(violations, common.max_violations)?;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let mut report = RunReport::new(violations, elapsed_ms, files.len());
    report.diff = diff_payload;

    let format = common
        .format
        .as_deref()
        .map(|f| reporter::Format::parse(f).ok_or_else(|| StrictureError::Config {
            detail: format!("unknown --format value '{f}' (expected text or json)"),
        }))
        .transpose()?
        .unwrap_or(reporter::Format::Text);

    let color = if common.color {
        true
    } else if common.no_color {
        false
    } else {
        true
    };

    reporter::emit(&report, format, common.output.as_deref(), color)?;

    let status = if report.violations.is_empty() { ExitStatus::Success } else { ExitStatus::Failure };
    Ok(AnalyzeOutcome { status })
}
