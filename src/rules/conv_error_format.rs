//! `CONV-error-format`: messages passed to error-construction calls must
//! read `{OPERATION}: {ROOT_CAUSE}[. {RECOVERY_ACTION}]` (§4.3).

use std::sync::LazyLock;

use regex::Regex;

use crate::conformance::ProjectContext;
use crate::model::{FileModel, Severity, Violation};
use crate::rules::helpers::{Style, split_words};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

pub struct ConvErrorFormat;

static GO_ERRORF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"fmt\.Errorf\s*\(\s*"((?:[^"\\]|\\.)*)""#).unwrap());
static GO_ERRORS_NEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"errors\.New\s*\(\s*"((?:[^"\\]|\\.)*)""#).unwrap());
static JS_NEW_ERROR_DQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"new\s+\w*Error\s*\(\s*"((?:[^"\\]|\\.)*)""#).unwrap());
static JS_NEW_ERROR_SQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"new\s+\w*Error\s*\(\s*'((?:[^'\\]|\\.)*)'").unwrap());
static JS_NEW_ERROR_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"new\s+\w*Error\s*\(\s*`([^`]*)`").unwrap());

static IDENT_CAMEL_PASCAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap());
static IDENT_UPPER_SNAKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

struct CallSite<'a> {
    name: &'static str,
    message: &'a str,
    is_dynamic: bool,
    line: usize,
}

fn scan_calls(source: &str) -> Vec<CallSite<'_>> {
    let mut sites = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let lineno = idx + 1;
        if let Some(caps) = GO_ERRORF.captures(line) {
            sites.push(CallSite { name: "fmt.Errorf", message: caps.get(1).unwrap().as_str(), is_dynamic: false, line: lineno });
        } else if let Some(caps) = GO_ERRORS_NEW.captures(line) {
            sites.push(CallSite { name: "errors.New", message: caps.get(1).unwrap().as_str(), is_dynamic: false, line: lineno });
        } else if let Some(caps) = JS_NEW_ERROR_DQ.captures(line) {
            sites.push(CallSite { name: "new Error", message: caps.get(1).unwrap().as_str(), is_dynamic: false, line: lineno });
        } else if let Some(caps) = JS_NEW_ERROR_SQ.captures(line) {
            sites.push(CallSite { name: "new Error", message: caps.get(1).unwrap().as_str(), is_dynamic: false, line: lineno });
        } else if let Some(caps) = JS_NEW_ERROR_TEMPLATE.captures(line) {
            let message = caps.get(1).unwrap().as_str();
            sites.push(CallSite { name: "new Error", message, is_dynamic: message.contains("${"), line: lineno });
        }
    }
    sites
}

fn is_operation_token(token: &str) -> bool {
    !token.is_empty() && (IDENT_CAMEL_PASCAL.is_match(token) || IDENT_UPPER_SNAKE.is_match(token))
}

fn is_valid_message(message: &str, min_segments: u8) -> bool {
    let Some((operation, rest)) = message.split_once(": ") else {
        return false;
    };
    if !is_operation_token(operation) {
        return false;
    }
    if rest.trim().is_empty() {
        return false;
    }
    if min_segments >= 3 && !rest.contains(". ") {
        return false;
    }
    true
}

/// Derive the operation token from a file's base name when a message has no
/// `operation: ` prefix to reuse (`handlers/create_user.go` -> `CreateUser`).
fn operation_from_path(path: &str) -> String {
    let stem = std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("operation");
    Style::Pascal.apply(&split_words(stem))
}

/// Split an operation phrase into words, first on whitespace (the common
/// "bad request: ..." shape `split_words` alone doesn't handle) and then on
/// `split_words`'s case/separator rules within each token.
fn tokenize_operation(operation: &str) -> Vec<String> {
    operation.split_whitespace().flat_map(split_words).collect()
}

/// Reshape one offending message into the expected
/// `{OPERATION}: {ROOT_CAUSE}[. {RECOVERY_ACTION}]` form.
fn suggest_message(message: &str, min_segments: u8, file_path: &str) -> String {
    let (operation, rest) = match message.split_once(": ") {
        Some((operation, rest)) if is_operation_token(operation) => (operation.to_string(), rest.trim()),
        Some((operation, rest)) => (Style::Pascal.apply(&tokenize_operation(operation)), rest.trim()),
        None => (operation_from_path(file_path), message.trim()),
    };

    let mut rest = if rest.is_empty() { "unexpected error".to_string() } else { rest.trim_end_matches('.').to_string() };

    if min_segments >= 3 && !rest.contains(". ") {
        rest.push_str(". Retry the request or contact support if the problem persists");
    }

    format!("{operation}: {rest}")
}

impl Rule for ConvErrorFormat {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CONV-error-format",
            category: RuleCategory::Conv,
            description: "Error messages must read '{OPERATION}: {ROOT_CAUSE}[. {RECOVERY_ACTION}]'",
            rationale: "Grep-able, consistently shaped error messages speed up incident triage",
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
        let min_segments: u8 = config
            .option("minSegments")
            .and_then(|v| v.as_u64())
            .map(|n| n as u8)
            .unwrap_or(2);
        let apply_to: Option<Vec<&str>> = config
            .option("applyTo")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect());

        let severity = config.resolve_severity(self.meta().default_severity);
        let text = file.text();

        scan_calls(&text)
            .into_iter()
            .filter(|site| apply_to.as_ref().is_none_or(|names| names.contains(&site.name)))
            .filter(|site| !site.is_dynamic)
            .filter(|site| !is_valid_message(site.message, min_segments))
            .map(|site| {
                Violation::new(
                    self.meta().id,
                    severity,
                    format!(
                        "{}(\"{}\") does not match '{{OPERATION}}: {{ROOT_CAUSE}}'",
                        site.name, site.message
                    ),
                    &file.path,
                    site.line,
                )
                .with_suggested_fix(suggest_message(site.message, min_segments, &file.path))
            })
            .collect()
    }
}
