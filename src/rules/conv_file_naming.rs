//! `CONV-file-naming`: the base name, with known suffixes stripped, must
//! match the selected style (§4.3, §6 language table).

use std::path::Path;

use crate::conformance::ProjectContext;
use crate::model::{FileModel, Language, Severity, Violation};
use crate::rules::helpers::{Style, split_words, strip_known_suffix};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

pub struct ConvFileNaming;

fn default_style_for(language: &Language) -> Style {
    match language {
        Language::Typescript | Language::Javascript => Style::Kebab,
        Language::Go | Language::Python => Style::Snake,
        Language::Java | Language::Kotlin => Style::Pascal,
        Language::Other(_) => Style::Kebab,
    }
}

impl Rule for ConvFileNaming {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CONV-file-naming",
            category: RuleCategory::Conv,
            description: "File base name must follow the per-language default (or configured) naming style",
            rationale: "Predictable file names make a tree navigable by convention",
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
        if config.is_off() {
            return Vec::new();
        }
        let style = config
            .option_str("style")
            .and_then(Style::parse)
            .unwrap_or_else(|| default_style_for(&file.language));

        let base_name = Path::new(&file.path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(&file.path);
        let (stem, suffix) = strip_known_suffix(base_name);

        if style.matches(stem) {
            return Vec::new();
        }

        let severity = config.resolve_severity(self.meta().default_severity);
        let words = split_words(stem);
        let suggested_stem = style.apply(&words);
        let suggested_name = format!("{suggested_stem}{suffix}");

        vec![Violation::new(
            self.meta().id,
            severity,
            format!(
                "file name '{base_name}' does not match '{}'; suggested '{suggested_name}'",
                style.name()
            ),
            &file.path,
            1,
        )
        .with_suggested_fix(suggested_name)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_pascal_case_typescript_file_with_kebab_suggestion() {
        let file = FileModel::new("UserService.ts", Language::Typescript, b"".to_vec());
        let violations = ConvFileNaming.check(&file, None, &RuleConfig::default());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("kebab-case"));
        assert_eq!(
            violations[0].context.as_ref().unwrap().suggested_fix.as_deref(),
            Some("user-service.ts")
        );
    }

    #[test]
    fn accepts_snake_case_go_file() {
        let file = FileModel::new("user_service.go", Language::Go, b"".to_vec());
        assert!(ConvFileNaming.check(&file, None, &RuleConfig::default()).is_empty());
    }

    #[test]
    fn preserves_test_suffix_in_suggestion() {
        let file = FileModel::new("UserService.test.ts", Language::Typescript, b"".to_vec());
        let violations = ConvFileNaming.check(&file, None, &RuleConfig::default());
        assert_eq!(
            violations[0].context.as_ref().unwrap().suggested_fix.as_deref(),
            Some("user-service.test.ts")
        );
    }

    #[test]
    fn style_option_overrides_default() {
        let file = FileModel::new("user_service.ts", Language::Typescript, b"".to_vec());
        let mut config = RuleConfig::default();
        config
            .options
            .insert("style".to_string(), serde_json::json!("snake_case"));
        assert!(ConvFileNaming.check(&file, None, &config).is_empty());
    }
}
