//! In-source suppression directives (C7, §4.7, §6).
//!
//! `stricture-disable-file RULE-ID` anywhere in a file disables that rule for
//! the whole file; `stricture-disable-next-line RULE-ID` on the line before a
//! violation's `startLine` suppresses just that one finding.

use std::collections::HashSet;

use crate::model::{FileModel, Language, Violation};

const DISABLE_FILE: &str = "stricture-disable-file";
const DISABLE_NEXT_LINE: &str = "stricture-disable-next-line";

fn comment_prefix(language: &Language) -> &'static str {
    match language {
        Language::Python => "#",
        _ => "//",
    }
}

/// Directives found in one file, keyed by the rule id they target.
struct Directives {
    disabled_files: HashSet<String>,
    /// line number (1-indexed) the directive sits on -> rule id disabled on
    /// the *following* line.
    disabled_next_line: Vec<(usize, String)>,
}

fn scan_directives(file: &FileModel) -> Directives {
    let prefix = comment_prefix(&file.language);
    let file_marker = format!("{prefix} {DISABLE_FILE}");
    let line_marker = format!("{prefix} {DISABLE_NEXT_LINE}");

    let mut disabled_files = HashSet::new();
    let mut disabled_next_line = Vec::new();

    for (idx, line) in file.text().lines().enumerate() {
        if let Some(pos) = line.find(&file_marker) {
            if let Some(rule_id) = extract_rule_id(&line[pos + file_marker.len()..]) {
                disabled_files.insert(rule_id);
            }
        }
        if let Some(pos) = line.find(&line_marker) {
            if let Some(rule_id) = extract_rule_id(&line[pos + line_marker.len()..]) {
                disabled_next_line.push((idx + 1, rule_id));
            }
        }
    }

    Directives {
        disabled_files,
        disabled_next_line,
    }
}

fn extract_rule_id(rest: &str) -> Option<String> {
    rest.split_whitespace().next().map(str::to_string)
}

/// Apply this file's suppression directives to the violations reported for
/// it. Suppression is evaluated against the violation's `startLine`, so a
/// `disable-next-line` directive on line N suppresses a violation whose
/// `startLine == N + 1`.
pub fn apply(file: &FileModel, violations: Vec<Violation>) -> Vec<Violation> {
    let directives = scan_directives(file);
    violations
        .into_iter()
        .filter(|v| {
            if directives.disabled_files.contains(&v.rule_id) {
                return false;
            }
            !directives
                .disabled_next_line
                .iter()
                .any(|(line, rule_id)| *rule_id == v.rule_id && v.start_line == line + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn file(path: &str, language: Language, source: &str) -> FileModel {
        FileModel::new(path, language, source.as_bytes().to_vec())
    }

    #[test]
    fn disable_file_suppresses_every_matching_violation() {
        let f = file(
            "a.ts",
            Language::Typescript,
            "// stricture-disable-file CONV-file-header\nexport const x = 1;\n",
        );
        let violations = vec![
            Violation::new("CONV-file-header", Severity::Error, "m", "a.ts", 1),
            Violation::new("CONV-file-header", Severity::Error, "m", "a.ts", 2),
        ];
        assert!(apply(&f, violations).is_empty());
    }

    #[test]
    fn disable_next_line_only_suppresses_the_following_line() {
        let f = file(
            "a.ts",
            Language::Typescript,
            "// stricture-disable-next-line CONV-export-naming\nexport const BadName = 1;\nexport const AlsoBad = 2;\n",
        );
        let violations = vec![
            Violation::new("CONV-export-naming", Severity::Error, "m", "a.ts", 2),
            Violation::new("CONV-export-naming", Severity::Error, "m", "a.ts", 3),
        ];
        let remaining = apply(&f, violations);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].start_line, 3);
    }

    #[test]
    fn python_uses_hash_prefix() {
        let f = file(
            "a.py",
            Language::Python,
            "# stricture-disable-file CONV-file-header\n",
        );
        let violations = vec![Violation::new("CONV-file-header", Severity::Error, "m", "a.py", 1)];
        assert!(apply(&f, violations).is_empty());
    }

    #[test]
    fn unrelated_rule_id_is_unaffected() {
        let f = file(
            "a.ts",
            Language::Typescript,
            "// stricture-disable-file CONV-file-header\n",
        );
        let violations = vec![Violation::new("CONV-export-naming", Severity::Error, "m", "a.ts", 1)];
        assert_eq!(apply(&f, violations).len(), 1);
    }
}
