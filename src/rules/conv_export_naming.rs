//! `CONV-export-naming`: exported symbols must match the per-kind,
//! per-language naming style (§4.3).

use crate::conformance::ProjectContext;
use crate::model::{ExportKind, FileModel, Language, Severity, Violation};
use crate::rules::helpers::{Style, split_words};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

pub struct ConvExportNaming;

fn default_style(kind: ExportKind, language: &Language) -> Option<Style> {
    match kind {
        ExportKind::Function => Some(if *language == Language::Go { Style::Pascal } else { Style::Camel }),
        ExportKind::Constant => Some(if *language == Language::Go { Style::Pascal } else { Style::UpperSnake }),
        ExportKind::Class | ExportKind::Type => Some(Style::Pascal),
        ExportKind::Value => Some(if *language == Language::Go { Style::Pascal } else { Style::Camel }),
        // `export default <expr>` has no meaningful identifier to check.
        ExportKind::Default => None,
    }
}

fn kind_option_key(kind: ExportKind) -> &'static str {
    match kind {
        ExportKind::Function => "function",
        ExportKind::Constant => "constant",
        ExportKind::Class => "class",
        ExportKind::Type => "type",
        ExportKind::Value => "value",
        ExportKind::Default => "default",
    }
}

/// Per-language style override: `options[language_tag][kind] = "PascalCase"`.
fn style_override(config: &RuleConfig, language: &Language, kind: ExportKind) -> Option<Style> {
    config
        .option(&language.to_string())?
        .as_object()?
        .get(kind_option_key(kind))?
        .as_str()
        .and_then(Style::parse)
}

impl Rule for ConvExportNaming {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CONV-export-naming",
            category: RuleCategory::Conv,
            description: "Exported symbols must follow the per-kind naming convention",
            rationale: "Consistent naming makes exported API surface predictable",
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
        let severity = config.resolve_severity(self.meta().default_severity);

        file.exports
            .iter()
            .filter_map(|export| {
                let style = style_override(config, &file.language, export.kind)
                    .or_else(|| default_style(export.kind, &file.language))?;
                if style.matches(&export.name) {
                    return None;
                }
                let suggested = style.apply(&split_words(&export.name));
                Some(
                    Violation::new(
                        self.meta().id,
                        severity,
                        format!(
                            "exported {} '{}' should be '{}' (got a name that does not match)",
                            export.kind,
                            export.name,
                            style.name()
                        ),
                        &file.path,
                        export.start_line,
                    )
                    .with_suggested_fix(suggested),
                )
            })
            .collect()
    }
}
