//! Plugin rules (§4.6, §9 "Polymorphic rule set"): YAML-declared rules
//! loaded from the `plugins` list in `.stricture.yml`. Each plugin
//! contributes a flat, table-driven `must_contain`/`must_not_contain`
//! pattern check scoped by language and path globs — no dynamic code
//! loading, favoring data-driven rule tables over a real plugin ABI.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;

use crate::conformance::ProjectContext;
use crate::model::{FileModel, Severity, Violation};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

/// One plugin rule definition, as read from a plugin YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginRuleDef {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Language tags this rule applies to (§6 language table); empty means
    /// every language.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Path globs this rule is scoped to; empty means every path.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Regex patterns that must appear at least once in a matching file.
    #[serde(default)]
    pub must_contain: Vec<String>,
    /// Regex patterns that must not appear anywhere in a matching file.
    #[serde(default)]
    pub must_not_contain: Vec<String>,
}

fn default_severity() -> String {
    "warn".to_string()
}

/// A plugin YAML file holds one or more rule definitions, either as a bare
/// sequence or wrapped under a `rules:` key (both forms are common in
/// hand-written plugin files).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PluginFile {
    Bare(Vec<PluginRuleDef>),
    Wrapped { rules: Vec<PluginRuleDef> },
}

/// Load every plugin definition referenced by `plugin_paths` (relative to
/// `root`), failing fast on any malformed file (§7: "malformed plugin
/// definition" is a parse error, exit 2).
pub fn load_plugins(root: &Path, plugin_paths: &[String]) -> Result<Vec<PluginRuleDef>> {
    let mut defs = Vec::new();
    for relative in plugin_paths {
        let path = root.join(relative);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading plugin definition {}", path.display()))?;
        let file: PluginFile = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing plugin definition {}", path.display()))?;
        defs.extend(match file {
            PluginFile::Bare(rules) => rules,
            PluginFile::Wrapped { rules } => rules,
        });
    }
    Ok(defs)
}

/// The registry-facing `Rule` wrapping one `PluginRuleDef`. Category prefix
/// is derived from the rule id's leading token before the first `-`
/// (§4.6: "category derived from the rule id prefix").
pub struct PluginRule {
    meta: RuleMeta,
    def: PluginRuleDef,
    languages: Vec<String>,
    paths: Vec<Pattern>,
    must_contain: Vec<Regex>,
    must_not_contain: Vec<Regex>,
}

impl PluginRule {
    pub fn new(def: PluginRuleDef) -> Result<Self> {
        let category = RuleCategory::Plugin(category_prefix(&def.id));
        let severity = Severity::parse(&def.severity).unwrap_or(Severity::Warn);
        let description: &'static str = Box::leak(def.description.clone().into_boxed_str());
        let rationale: &'static str = Box::leak(def.rationale.clone().into_boxed_str());
        let id: &'static str = Box::leak(def.id.clone().into_boxed_str());

        let must_contain = def
            .must_contain
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid must_contain pattern '{p}' in rule '{}'", def.id)))
            .collect::<Result<Vec<_>>>()?;
        let must_not_contain = def
            .must_not_contain
            .iter()
            .map(|p| {
                Regex::new(p).with_context(|| format!("invalid must_not_contain pattern '{p}' in rule '{}'", def.id))
            })
            .collect::<Result<Vec<_>>>()?;
        let paths = def
            .paths
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("invalid path glob '{p}' in rule '{}'", def.id)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            meta: RuleMeta {
                id,
                category,
                description,
                rationale,
                default_severity: severity,
                needs_project_context: false,
                fixable: false,
            },
            languages: def.languages.clone(),
            paths,
            must_contain,
            must_not_contain,
            def,
        })
    }

    fn applies_to(&self, file: &FileModel) -> bool {
        let language_ok = self.languages.is_empty() || self.languages.iter().any(|l| l == &file.language.to_string());
        let path_ok = self.paths.is_empty() || self.paths.iter().any(|p| p.matches(&file.path));
        language_ok && path_ok
    }
}

fn category_prefix(id: &str) -> String {
    id.split('-').next().unwrap_or(id).to_ascii_uppercase()
}

impl Rule for PluginRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(&self, file: &FileModel, _project: Option<&ProjectContext>, config: &RuleConfig) -> Vec<Violation> {
        if config.is_off() || !self.applies_to(file) {
            return Vec::new();
        }
        let severity = config.resolve_severity(self.meta.default_severity);
        let text = file.text();
        let mut violations = Vec::new();

        for pattern in &self.must_contain {
            if !pattern.is_match(&text) {
                violations.push(Violation::new(
                    self.def.id.clone(),
                    severity,
                    format!("file does not contain a match for required pattern '{}'", pattern.as_str()),
                    &file.path,
                    1,
                ));
            }
        }

        for pattern in &self.must_not_contain {
            for (idx, line) in text.lines().enumerate() {
                if pattern.is_match(line) {
                    violations.push(Violation::new(
                        self.def.id.clone(),
                        severity,
                        format!("line matches forbidden pattern '{}'", pattern.as_str()),
                        &file.path,
                        idx + 1,
                    ));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;
    use tempfile::tempdir;

    #[test]
    fn loads_bare_sequence_plugin_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("plugin.yml"),
            "- id: PLUGIN-no-console\n  must_not_contain: [\"console\\\\.log\"]\n",
        )
        .unwrap();
        let defs = load_plugins(dir.path(), &["plugin.yml".to_string()]).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, "PLUGIN-no-console");
    }

    #[test]
    fn loads_wrapped_plugin_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("plugin.yml"),
            "rules:\n  - id: PLUGIN-require-license\n    must_contain: [\"Copyright\"]\n",
        )
        .unwrap();
        let defs = load_plugins(dir.path(), &["plugin.yml".to_string()]).unwrap();
        assert_eq!(defs.len(), 1);
    }

    #[test]
    fn must_not_contain_flags_matching_line() {
        let def = PluginRuleDef {
            id: "PLUGIN-no-console".to_string(),
            description: String::new(),
            rationale: String::new(),
            severity: "warn".to_string(),
            languages: vec![],
            paths: vec![],
            must_contain: vec![],
            must_not_contain: vec![r"console\.log".to_string()],
        };
        let rule = PluginRule::new(def).unwrap();
        let file = FileModel::new("a.ts", Language::Typescript, b"console.log('x');\n".to_vec());
        let violations = rule.check(&file, None, &RuleConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id, "PLUGIN-no-console");
    }

    #[test]
    fn must_contain_flags_when_absent() {
        let def = PluginRuleDef {
            id: "PLUGIN-require-license".to_string(),
            description: String::new(),
            rationale: String::new(),
            severity: "error".to_string(),
            languages: vec![],
            paths: vec![],
            must_contain: vec!["Copyright".to_string()],
            must_not_contain: vec![],
        };
        let rule = PluginRule::new(def).unwrap();
        let file = FileModel::new("a.go", Language::Go, b"package main\n".to_vec());
        let violations = rule.check(&file, None, &RuleConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn scoping_by_path_glob_excludes_non_matching_files() {
        let def = PluginRuleDef {
            id: "PLUGIN-no-todo".to_string(),
            description: String::new(),
            rationale: String::new(),
            severity: "warn".to_string(),
            languages: vec![],
            paths: vec!["src/**".to_string()],
            must_contain: vec![],
            must_not_contain: vec!["TODO".to_string()],
        };
        let rule = PluginRule::new(def).unwrap();
        let file = FileModel::new("vendor/lib.ts", Language::Typescript, b"// TODO later\n".to_vec());
        assert!(rule.check(&file, None, &RuleConfig::default()).is_empty());
    }

    #[test]
    fn category_prefix_derives_from_id_leading_token() {
        assert_eq!(category_prefix("PLUGIN-no-console"), "PLUGIN");
        assert_eq!(category_prefix("SECURITY-no-eval"), "SECURITY");
    }
}
