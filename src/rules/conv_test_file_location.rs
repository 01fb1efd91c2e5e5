//! `CONV-test-file-location`: test files must live in a location compatible
//! with the configured strategy (§4.3, §6 path transforms).

use crate::conformance::ProjectContext;
use crate::model::{FileModel, Severity, Violation};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

pub struct ConvTestFileLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Colocated,
    Mirrored,
    Subfolder,
}

impl Strategy {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "colocated" => Some(Strategy::Colocated),
            "mirrored" => Some(Strategy::Mirrored),
            "subfolder" => Some(Strategy::Subfolder),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Strategy::Colocated => "colocated",
            Strategy::Mirrored => "mirrored",
            Strategy::Subfolder => "subfolder",
        }
    }

    fn is_satisfied_by(&self, path: &str) -> bool {
        match self {
            Strategy::Colocated => !is_rooted_at_tests(path) && !has_tests_segment(path),
            Strategy::Mirrored => is_rooted_at_tests(path),
            Strategy::Subfolder => has_tests_segment(path),
        }
    }

    fn suggest(&self, path: &str) -> String {
        match self {
            Strategy::Colocated => {
                if let Some(rest) = path.strip_prefix("tests/").or_else(|| path.strip_prefix("test/")) {
                    format!("src/{rest}")
                } else if path.contains("/__tests__/") {
                    path.replace("/__tests__/", "/")
                } else {
                    path.to_string()
                }
            }
            Strategy::Mirrored => {
                let stripped = path.strip_prefix("src/").unwrap_or(path);
                format!("tests/{stripped}")
            }
            Strategy::Subfolder => match path.rsplit_once('/') {
                Some((dir, base)) => format!("{dir}/__tests__/{base}"),
                None => format!("__tests__/{path}"),
            },
        }
    }
}

fn is_rooted_at_tests(path: &str) -> bool {
    path.starts_with("tests/") || path.starts_with("test/")
}

fn has_tests_segment(path: &str) -> bool {
    path.contains("/__tests__/") || path.starts_with("__tests__/")
}

impl Rule for ConvTestFileLocation {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CONV-test-file-location",
            category: RuleCategory::Conv,
            description: "Test files must live in the location dictated by the configured strategy",
            rationale: "A consistent test layout lets tooling and humans find tests by convention",
            default_severity: Severity::Warn,
            needs_project_context: false,
            fixable: true,
        }
    }

    fn check(
        &self,
        file: &FileModel,
        _project: Option<&ProjectContext>,
        config: &RuleConfig,
    ) -> Vec<Violation> {
        if config.is_off() || !file.is_test_file {
            return Vec::new();
        }
        let strategy = config
            .option_str("strategy")
            .and_then(Strategy::parse)
            .unwrap_or(Strategy::Colocated);

        if strategy.is_satisfied_by(&file.path) {
            return Vec::new();
        }

        let severity = config.resolve_severity(self.meta().default_severity);
        let suggested = strategy.suggest(&file.path);
        vec![Violation::new(
            self.meta().id,
            severity,
            format!(
                "test file '{}' does not match the '{}' layout; suggested '{suggested}'",
                file.path,
                strategy.name()
            ),
            &file.path,
            1,
        )
        .with_suggested_fix(suggested)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    fn test_file(path: &str) -> FileModel {
        let mut file = FileModel::new(path, Language::Typescript, b"".to_vec());
        file.is_test_file = true;
        file
    }

    #[test]
    fn non_test_files_are_ignored() {
        let file = FileModel::new("tests/src.ts", Language::Typescript, b"".to_vec());
        assert!(ConvTestFileLocation.check(&file, None, &RuleConfig::default()).is_empty());
    }

    #[test]
    fn colocated_rejects_tests_root() {
        let file = test_file("tests/foo.test.ts");
        let violations = ConvTestFileLocation.check(&file, None, &RuleConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].context.as_ref().unwrap().suggested_fix.as_deref(),
            Some("src/foo.test.ts")
        );
    }

    #[test]
    fn mirrored_requires_tests_root() {
        let file = test_file("src/foo.test.ts");
        let mut config = RuleConfig::default();
        config
            .options
            .insert("strategy".to_string(), serde_json::json!("mirrored"));
        let violations = ConvTestFileLocation.check(&file, None, &config);
        assert_eq!(
            violations[0].context.as_ref().unwrap().suggested_fix.as_deref(),
            Some("tests/foo.test.ts")
        );
    }

    #[test]
    fn subfolder_requires_tests_segment() {
        let file = test_file("src/foo.test.ts");
        let mut config = RuleConfig::default();
        config
            .options
            .insert("strategy".to_string(), serde_json::json!("subfolder"));
        let violations = ConvTestFileLocation.check(&file, None, &config);
        assert_eq!(
            violations[0].context.as_ref().unwrap().suggested_fix.as_deref(),
            Some("src/__tests__/foo.test.ts")
        );
    }
}
