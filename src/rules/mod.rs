//! Rule registry (C2): enumerates built-in rules, holds their metadata, and
//! dispatches `(FileModel, ProjectContext?, RuleConfig) -> Vec<Violation>`.
//!
//! A plain data struct (`RuleMeta`) plus a trait object behind `Box<dyn
//! Rule>`. The registry itself is a flat `Vec`, not an inheritance hierarchy
//! (Design Note §9).

mod conv_error_format;
mod conv_export_naming;
mod conv_file_header;
mod conv_file_naming;
mod conv_required_exports;
mod conv_test_file_location;
pub mod helpers;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conformance::ProjectContext;
use crate::model::{FileModel, Severity, Violation};

/// Category prefix a rule id belongs to (§4.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleCategory {
    Conv,
    Ctr,
    Plugin(String),
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Conv => write!(f, "CONV"),
            RuleCategory::Ctr => write!(f, "CTR"),
            RuleCategory::Plugin(prefix) => write!(f, "{prefix}"),
        }
    }
}

/// Static metadata the registry and `list-rules`/`explain` surface (§4.2, §6).
#[derive(Debug, Clone)]
pub struct RuleMeta {
    pub id: &'static str,
    pub category: RuleCategory,
    pub description: &'static str,
    pub rationale: &'static str,
    pub default_severity: Severity,
    /// Set by rules that require a loaded manifest (CTR-* rules); such
    /// rules are silently excluded when no manifest is configured (§4.2).
    pub needs_project_context: bool,
    pub fixable: bool,
}

/// Per-rule configuration: resolved severity override plus a free-form
/// options map (§3 `RuleConfig`). `severity: None` means "use the rule's
/// default"; `Severity::Off` excludes the rule entirely and is represented
/// out-of-band by `RuleConfig::is_off`, since `model::Severity` itself only
/// has `{warn, error}` (a `Violation`'s severity is never `off`, per §3:
/// "severity (resolved, not \"off\")").
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub severity: Option<RuleSeverityOverride>,
    pub options: BTreeMap<String, serde_json::Value>,
}

/// The raw three-state severity a config file may specify for a rule,
/// distinct from `model::Severity` (which has no "off" state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSeverityOverride {
    Warn,
    Error,
    Off,
}

impl RuleConfig {
    pub fn is_off(&self) -> bool {
        matches!(self.severity, Some(RuleSeverityOverride::Off))
    }

    /// Resolve the effective severity: first defined of
    /// {RuleConfig.severity, rule default} (§4.7).
    pub fn resolve_severity(&self, default: Severity) -> Severity {
        match self.severity {
            Some(RuleSeverityOverride::Error) => Severity::Error,
            Some(RuleSeverityOverride::Warn) => Severity::Warn,
            Some(RuleSeverityOverride::Off) | None => default,
        }
    }

    /// Defensive option lookup: nested maps may arrive with non-string keys
    /// from the YAML reader; treat those as absent (Design Note §9).
    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.options.get(key)
    }

    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.option(key).and_then(|v| v.as_str())
    }
}

/// The behavior every rule implements. Pure function of its inputs — no
/// global state (Design Note §9).
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn check(
        &self,
        file: &FileModel,
        project: Option<&ProjectContext>,
        config: &RuleConfig,
    ) -> Vec<Violation>;
}

/// The flat rule registry (§4.2, Design Note §9: "flat mapping from id to
/// implementation").
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    /// Build the registry with the built-in `CONV-*` rules. `CTR-*` rules
    /// are registered by `conformance::register` when a manifest is loaded,
    /// and plugin rules by `engine::load_plugins`.
    pub fn with_builtins() -> Self {
        let mut registry = Self { rules: Vec::new() };
        registry.register(Box::new(conv_file_header::ConvFileHeader));
        registry.register(Box::new(conv_file_naming::ConvFileNaming));
        registry.register(Box::new(conv_export_naming::ConvExportNaming));
        registry.register(Box::new(conv_required_exports::ConvRequiredExports));
        registry.register(Box::new(conv_test_file_location::ConvTestFileLocation));
        registry.register(Box::new(conv_error_format::ConvErrorFormat));
        registry
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.meta().id == id).map(|r| r.as_ref())
    }

    pub fn all(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Select rules to run this pass, applying (a) `--rule` flags
    /// (OR-combined, empty = all), (b) `severity: off` exclusion, (c)
    /// manifest-dependence exclusion when no manifest is configured (§4.2).
    pub fn select<'a>(
        &'a self,
        rule_ids: &[String],
        configs: &BTreeMap<String, RuleConfig>,
        manifest_configured: bool,
    ) -> Vec<&'a dyn Rule> {
        self.rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| rule_ids.is_empty() || rule_ids.iter().any(|id| id == r.meta().id))
            .filter(|r| !configs.get(r.meta().id).is_some_and(RuleConfig::is_off))
            .filter(|r| !(r.meta().needs_project_context && !manifest_configured))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
