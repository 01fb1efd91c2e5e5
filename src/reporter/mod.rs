//! Reporter (C8, §4.8): deterministic ordering, text/JSON rendering, and
//! `--output` file writing.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::model::{RunReport, Severity, Violation};

/// Output format selected by `--format` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Format::Text),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Sort violations by (ruleId, filePath, startLine, column(0), message), the
/// order §4.8 requires before truncation or rendering.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Render `report` in the requested format and either write it to `output`
/// (stdout then empty) or print it to stdout.
pub fn emit(report: &RunReport, format: Format, output: Option<&Path>, color: bool) -> Result<()> {
    let rendered = match format {
        Format::Text => render_text(report, color),
        Format::Json => render_json(report)?,
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create directory for {}", path.display()))?;
                }
            }
            fs::write(path, rendered).with_context(|| format!("failed to write report to {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            let _ = write!(stdout, "{rendered}");
        }
    }

    Ok(())
}

fn render_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report")
}

fn render_text(report: &RunReport, color: bool) -> String {
    colored::control::set_override(color);
    let mut out = String::new();

    for violation in &report.violations {
        print_violation(violation, &mut out);
    }

    print_summary(report, &mut out);
    out
}

fn print_violation(violation: &Violation, out: &mut String) {
    let severity_str = match violation.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warn => "warning".bold().yellow(),
    };

    out.push_str(&format!(
        "{}: {}  {}\n",
        severity_str,
        violation.message,
        violation.rule_id.dimmed().cyan()
    ));
    out.push_str(&format!(
        "  {} {}:{}\n",
        "-->".blue(),
        violation.file_path,
        violation.start_line
    ));

    if let Some(fix) = violation.context.as_ref().and_then(|c| c.suggested_fix.as_deref()) {
        out.push_str(&format!("  {} {} {}\n", "=".blue(), "suggested fix:".bold(), fix));
    }

    out.push('\n');
}

fn print_summary(report: &RunReport, out: &mut String) {
    let summary = &report.summary;
    out.push_str(&format!(
        "Summary: {} total, {} {}, {} {} ({} files scanned, {}ms)\n",
        summary.total,
        summary.errors,
        if summary.errors == 1 { "error" } else { "errors" },
        summary.warnings,
        if summary.warnings == 1 { "warning" } else { "warnings" },
        summary.files_scanned,
        summary.elapsed_ms,
    ));

    if let Some(diff) = &report.diff {
        out.push_str(&format!(
            "Diff: {} added, {} resolved\n",
            diff.summary.added, diff.summary.resolved
        ));
    }
}
