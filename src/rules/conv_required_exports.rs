//! `CONV-required-exports`: a module matching a configured glob must expose
//! every required export name (§4.3).

use glob::Pattern;

use crate::conformance::ProjectContext;
use crate::model::{FileModel, Severity, Violation};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

pub struct ConvRequiredExports;

struct PatternRule {
    module_glob: String,
    required: Vec<String>,
}

/// `options.patterns`: `{glob: {required: [name-or-glob, ...]}}` (§4.3).
fn parse_patterns(config: &RuleConfig) -> Vec<PatternRule> {
    let Some(patterns) = config.option("patterns").and_then(|v| v.as_object()) else {
        return Vec::new();
    };
    patterns
        .iter()
        .filter_map(|(glob, spec)| {
            let required = spec.get("required")?.as_array()?;
            let required: Vec<String> = required
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            Some(PatternRule {
                module_glob: glob.clone(),
                required,
            })
        })
        .collect()
}

impl Rule for ConvRequiredExports {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CONV-required-exports",
            category: RuleCategory::Conv,
            description: "A module matching a configured glob must expose its required exports",
            rationale: "Certain module shapes (e.g. route handlers) must expose a fixed surface",
            default_severity: Severity::Error,
            needs_project_context: false,
            fixable: false,
        }
    }

    fn check(
        &self,
        file: &FileModel,
        _project: Option<&ProjectContext>,
        config: &RuleConfig,
    ) -> Vec<Violation> {
        if config.is_off() {
            return Vec::new();
        }
        let severity = config.resolve_severity(self.meta().default_severity);
        let exported_names: Vec<&str> = file.exports.iter().map(|e| e.name.as_str()).collect();

        parse_patterns(config)
            .iter()
            .filter_map(|rule| {
                let glob = Pattern::new(&rule.module_glob).ok()?;
                if !glob.matches(&file.path) {
                    return None;
                }
                let missing: Vec<&String> = rule
                    .required
                    .iter()
                    .filter(|required| !export_satisfies(required, &exported_names))
                    .collect();
                if missing.is_empty() {
                    return None;
                }
                let names: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
                Some(Violation::new(
                    self.meta().id,
                    severity,
                    format!(
                        "module matching '{}' is missing required export(s): {}",
                        rule.module_glob,
                        names.join(", ")
                    ),
                    &file.path,
                    1,
                ))
            })
            .collect()
    }
}

/// A required entry may itself be a `*` glob that matches any exported name.
fn export_satisfies(required: &str, exported_names: &[&str]) -> bool {
    if required.contains('*') {
        Pattern::new(required)
            .map(|p| exported_names.iter().any(|n| p.matches(n)))
            .unwrap_or(false)
    } else {
        exported_names.contains(&required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExportKind, ExportSymbol, Language};

    fn config_with_patterns(json: serde_json::Value) -> RuleConfig {
        let mut config = RuleConfig::default();
        config.options.insert("patterns".to_string(), json);
        config
    }

    #[test]
    fn flags_missing_required_export() {
        let file = FileModel::new("src/routes/users.ts", Language::Typescript, b"".to_vec());
        let config = config_with_patterns(serde_json::json!({
            "src/routes/*.ts": { "required": ["handler"] }
        }));
        let violations = ConvRequiredExports.check(&file, None, &config);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("handler"));
    }

    #[test]
    fn accepts_when_required_export_present() {
        let mut file = FileModel::new("src/routes/users.ts", Language::Typescript, b"".to_vec());
        file.exports = vec![ExportSymbol::new("handler", ExportKind::Function, 3)];
        let config = config_with_patterns(serde_json::json!({
            "src/routes/*.ts": { "required": ["handler"] }
        }));
        assert!(ConvRequiredExports.check(&file, None, &config).is_empty());
    }

    #[test]
    fn glob_required_entry_matches_any_name() {
        let mut file = FileModel::new("src/routes/users.ts", Language::Typescript, b"".to_vec());
        file.exports = vec![ExportSymbol::new("anyHandler", ExportKind::Function, 3)];
        let config = config_with_patterns(serde_json::json!({
            "src/routes/*.ts": { "required": ["*Handler"] }
        }));
        assert!(ConvRequiredExports.check(&file, None, &config).is_empty());
    }

    #[test]
    fn non_matching_module_is_ignored() {
        let file = FileModel::new("src/lib/util.ts", Language::Typescript, b"".to_vec());
        let config = config_with_patterns(serde_json::json!({
            "src/routes/*.ts": { "required": ["handler"] }
        }));
        assert!(ConvRequiredExports.check(&file, None, &config).is_empty());
    }
}
