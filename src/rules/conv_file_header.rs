//! `CONV-file-header`: the first non-blank line must be a header comment of
//! the shape `{prefix} {basename} — {purpose}` (§4.3).

use std::path::Path;

use crate::conformance::ProjectContext;
use crate::model::{FileModel, Language, Severity, Violation};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

pub struct ConvFileHeader;

fn comment_prefix(language: &Language) -> &'static str {
    match language {
        Language::Python => "#",
        _ => "//",
    }
}

impl Rule for ConvFileHeader {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CONV-file-header",
            category: RuleCategory::Conv,
            description: "First non-blank line must be a `{prefix} {basename} — {purpose}` header",
            rationale: "Every file should say what it is for at a glance",
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
        let basename = Path::new(&file.path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(&file.path);
        let prefix = comment_prefix(&file.language);

        let text = file.text();
        let Some((line_no, line)) = text
            .lines()
            .enumerate()
            .find(|(_, l)| !l.trim().is_empty())
        else {
            return Vec::new();
        };

        let expected_lead = format!("{prefix} {basename} ");
        let em_dash_form = format!("{prefix} {basename} — ");
        let is_valid = line.starts_with(&em_dash_form)
            || (line.starts_with(&expected_lead) && line.contains('—'));

        if is_valid {
            return Vec::new();
        }

        let severity = config.resolve_severity(self.meta().default_severity);
        let suggested_fix = format!("{prefix} {basename} — ");
        vec![Violation::new(
            self.meta().id,
            severity,
            format!("file is missing a `{prefix} {basename} — {{purpose}}` header"),
            &file.path,
            line_no + 1,
        )
        .with_suggested_fix(suggested_fix)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_missing_header() {
        let file = FileModel::new("bad.go", Language::Go, b"package main\n\nfunc main() {}\n".to_vec());
        let violations = ConvFileHeader.check(&file, None, &RuleConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id, "CONV-file-header");
        assert_eq!(violations[0].start_line, 1);
        assert_eq!(
            violations[0].context.as_ref().unwrap().suggested_fix.as_deref(),
            Some("// bad.go — ")
        );
    }

    #[test]
    fn accepts_valid_header() {
        let file = FileModel::new(
            "bad.go",
            Language::Go,
            b"// bad.go \xe2\x80\x94 entry point\npackage main\n".to_vec(),
        );
        let violations = ConvFileHeader.check(&file, None, &RuleConfig::default());
        assert!(violations.is_empty());
    }

    #[test]
    fn uses_hash_prefix_for_python() {
        let file = FileModel::new("util.py", Language::Python, b"def f(): pass\n".to_vec());
        let violations = ConvFileHeader.check(&file, None, &RuleConfig::default());
        assert_eq!(
            violations[0].context.as_ref().unwrap().suggested_fix.as_deref(),
            Some("# util.py — ")
        );
    }
}
