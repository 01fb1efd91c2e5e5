//! CLI argument definitions (§6).
//!
//! The binary has one primary action — analyze a project — plus a handful
//! of utility subcommands. A plain `Arguments { command: Option<Command> }`
//! shape would force every top-level flag to live under a subcommand;
//! instead the top-level flags here ARE the primary action's arguments, and
//! `command` only captures the secondary, rarely-combined operations
//! (`inspect`, `list-rules`, …).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stricture", author, version, about, long_about = None)]
pub struct Arguments {
    /// Paths to scan; defaults to the current directory.
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags shared by the default analyze action and `audit` (§6 CLI surface table).
#[derive(Debug, Clone, Parser)]
pub struct CommonArgs {
    /// Output format (default text).
    #[arg(long, value_name = "text|json")]
    pub format: Option<String>,

    /// Restrict to the listed rule ids (repeatable, OR-combined).
    #[arg(long = "rule", value_name = "ID")]
    pub rules: Vec<String>,

    /// Floor filter: warn or error.
    #[arg(long, value_name = "warn|error")]
    pub severity: Option<String>,

    /// Alias for `--severity error`; conflicts with an explicit `--severity`.
    #[arg(long)]
    pub quiet: bool,

    /// Force ANSI color on.
    #[arg(long)]
    pub color: bool,

    /// Force ANSI color off.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Explicit project config path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore project config entirely.
    #[arg(long = "no-config")]
    pub no_config: bool,

    /// Worker pool size (default: min(CPU, 8)).
    #[arg(long, value_name = "N")]
    pub concurrency: Option<i64>,

    /// Disable per-(file, rule) memoization.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Restrict to files with this extension (repeatable).
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Scope to files differing from HEAD.
    #[arg(long)]
    pub changed: bool,

    /// Scope to index-staged files.
    #[arg(long)]
    pub staged: bool,

    /// Baseline file path.
    #[arg(long, value_name = "PATH")]
    pub baseline: Option<PathBuf>,

    /// Report added/resolved violations against the baseline instead of filtering.
    #[arg(long)]
    pub diff: bool,

    /// Truncate the report to the first N violations.
    #[arg(long = "max-violations", value_name = "N")]
    pub max_violations: Option<i64>,

    /// Apply fixable suggestions to source files.
    #[arg(long)]
    pub fix: bool,

    /// Print what `--fix` would change without writing files.
    #[arg(long = "fix-dry-run")]
    pub fix_dry_run: bool,

    /// Write a `.bak` copy before applying `--fix`.
    #[arg(long = "fix-backup")]
    pub fix_backup: bool,

    /// Write the report to this path instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Explicit manifest file (else discovered via config).
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Emit the FileModel JSON for one file.
    Inspect { path: PathBuf },
    /// List built-in and plugin rules (tabular metadata).
    ListRules,
    /// Print the detail block for one rule id.
    Explain { rule_id: String },
    /// Write a default `.stricture.yml` in the current directory.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Validate a `.stricture.yml` file's structure without running an analysis.
    ValidateConfig { path: PathBuf },
    /// Run a manifest-driven analysis (requires `--manifest` or a configured manifest).
    Audit {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Validate a captured trace (HAR/OTEL/custom) against the manifest.
    Trace {
        file: PathBuf,
        /// Override trace format detection.
        #[arg(long = "trace-format", value_name = "har|otel|custom")]
        trace_format: Option<String>,
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,
    },
}
