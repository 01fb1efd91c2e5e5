//! Validation-evidence detection (§4.1/§4.5): adapters only expose evidence
//! that a field's constraint is checked somewhere in the file; deciding
//! whether that evidence satisfies a manifest contract is C5's job. Where a
//! regex can pull a literal bound, enum value, or status code off the line,
//! it's captured on `value` so C5 can diff it across sides; when the site
//! only proves a constraint kind is enforced (a comparison against a
//! variable, a `switch` over bare identifiers), `value` stays `None`.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{EvidenceKind, EvidenceValue, FormatKind, Language, ValidationEvidence};

// Range evidence: numeric comparisons and `.min(...).max(...)` / struct-tag
// `validate:"min=...,max=..."` style constraints.
static JS_RANGE_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\w+)\s*(<=|>=|<|>)\s*(-?\d+(?:\.\d+)?)").unwrap());
static JS_MIN_MAX_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(\w+)\s*\.(?:min|max)\s*\(").unwrap());
static GO_STRUCT_TAG_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s+\w+\s+`[^`]*validate:"([^"]*(?:min|max)=\d[^"]*)"[^`]*`"#).unwrap()
});

// Length evidence: `.length`/`len()` comparisons and length-flavored struct
// tags.
static JS_LENGTH_COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\w+)\s*\.\s*length\s*(<=|>=|<|>|===|==)\s*(\d+)").unwrap()
});
static GO_LEN_COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)len\s*\(\s*(\w+)\s*\)\s*(<=|>=|<|>|==)\s*(\d+)").unwrap()
});
static GO_STRUCT_TAG_LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s+\w+\s+`[^`]*validate:"([^"]*len=\d[^"]*)"[^`]*`"#).unwrap()
});

// Enum evidence: switch/match exhaustiveness over a field, or membership
// checks against a fixed set. Values are collected by scanning forward from
// the switch line to its closing brace for `case ...:` lines.
static JS_SWITCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)switch\s*\(\s*(\w+)\.?(\w*)\s*\)").unwrap());
static GO_SWITCH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)switch\s+(\w+)\s*\{?$").unwrap());
static GO_STRUCT_TAG_ONEOF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s+\w+\s+`[^`]*validate:"[^"]*oneof=([^",]*)[^"]*"[^`]*`"#).unwrap()
});
static CASE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^case\s+(.+):\s*$").unwrap());

// Format evidence: library calls that parse a known shape, and struct tags
// naming the same shape.
static FORMAT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\w+)\s*[.:]?\s*(?:is)?(email|uuid|url|iso8601|datetime)\s*\(").unwrap()
});
static GO_MAIL_PARSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"mail\.ParseAddress\s*\(\s*(\w+)").unwrap());
static GO_UUID_PARSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"uuid\.Parse\s*\(\s*(\w+)").unwrap());
static GO_URL_PARSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\.Parse\s*\(\s*(\w+)").unwrap());
static GO_TIME_PARSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time\.Parse\s*\(\s*time\.RFC3339\s*,\s*(\w+)").unwrap());
static GO_STRUCT_TAG_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s+\w+\s+`[^`]*validate:"[^"]*(email|uuid|url|iso8601)[^"]*"[^`]*`"#).unwrap()
});

// Error-shape and status-code evidence: a handler that constructs a typed
// error payload, or sets/returns an HTTP status literal.
static JS_STATUS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.status\s*\(\s*(\d{3})\s*\)").unwrap());
static GO_STATUS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"WriteHeader\s*\(\s*(?:http\.Status\w+|(\d{3}))\s*\)").unwrap());
static ERROR_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\berror\s*:\s*\{|errors\.New\s*\(|fmt\.Errorf\s*\("#).unwrap()
});
static MIN_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmin\s*=\s*(-?\d+(?:\.\d+)?)").unwrap());
static MAX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmax\s*=\s*(-?\d+(?:\.\d+)?)").unwrap());
static LEN_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\blen\s*=\s*(\d+)").unwrap());
static MIN_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.min\s*\(\s*(-?\d+(?:\.\d+)?)\s*\)").unwrap());
static MAX_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.max\s*\(\s*(-?\d+(?:\.\d+)?)\s*\)").unwrap());

pub fn detect_validation_evidence(
    path: &str,
    language: &Language,
    source: &str,
) -> Vec<ValidationEvidence> {
    match language {
        Language::Typescript | Language::Javascript => detect_js(path, source),
        Language::Go => detect_go(path, source),
        _ => Vec::new(),
    }
}

fn push(
    evidence: &mut Vec<ValidationEvidence>,
    field_name: &str,
    kind: EvidenceKind,
    path: &str,
    line: usize,
    value: Option<EvidenceValue>,
) {
    evidence.push(ValidationEvidence {
        field_name: field_name.to_string(),
        kind,
        file: path.to_string(),
        line,
        value,
    });
}

fn comparison_bound(op: &str, num: f64) -> EvidenceValue {
    match op {
        "<" | "<=" => EvidenceValue::Bound { min: None, max: Some(num) },
        ">" | ">=" => EvidenceValue::Bound { min: Some(num), max: None },
        // "==="/"=="/"==" pin both ends to the same literal.
        _ => EvidenceValue::Bound { min: Some(num), max: Some(num) },
    }
}

/// Read `min=`/`max=` literals out of a `validate:"..."` tag body.
fn tag_bound(tag_content: &str) -> Option<EvidenceValue> {
    let min = MIN_LITERAL.captures(tag_content).and_then(|c| c[1].parse::<f64>().ok());
    let max = MAX_LITERAL.captures(tag_content).and_then(|c| c[1].parse::<f64>().ok());
    if min.is_none() && max.is_none() {
        None
    } else {
        Some(EvidenceValue::Bound { min, max })
    }
}

/// Read `.min(N)`/`.max(N)` fluent-call literals off a line (e.g. Zod's
/// `z.number().min(0).max(120)`).
fn call_bound(line: &str) -> Option<EvidenceValue> {
    let min = MIN_CALL.captures(line).and_then(|c| c[1].parse::<f64>().ok());
    let max = MAX_CALL.captures(line).and_then(|c| c[1].parse::<f64>().ok());
    if min.is_none() && max.is_none() {
        None
    } else {
        Some(EvidenceValue::Bound { min, max })
    }
}

/// A bare `len=N` tag enforces an exact length, i.e. both bounds at once.
fn tag_exact_length(tag_content: &str) -> Option<EvidenceValue> {
    LEN_LITERAL
        .captures(tag_content)
        .and_then(|c| c[1].parse::<f64>().ok())
        .map(|n| EvidenceValue::Bound { min: Some(n), max: Some(n) })
}

fn case_tokens(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(|tok| tok.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Scan forward from a `switch` line's index to its closing brace, collecting
/// every `case ...:` token list along the way.
fn scan_switch_values(lines: &[&str], start_idx: usize) -> Vec<String> {
    let mut depth =
        lines[start_idx].matches('{').count() as i32 - lines[start_idx].matches('}').count() as i32;
    let mut values = Vec::new();
    if depth <= 0 {
        return values;
    }
    for line in &lines[start_idx + 1..] {
        let trimmed = line.trim();
        if let Some(caps) = CASE_LINE.captures(trimmed) {
            values.extend(case_tokens(&caps[1]));
        }
        depth += line.matches('{').count() as i32;
        depth -= line.matches('}').count() as i32;
        if depth <= 0 {
            break;
        }
    }
    values.sort();
    values.dedup();
    values
}

fn detect_js(path: &str, source: &str) -> Vec<ValidationEvidence> {
    let mut evidence = Vec::new();
    let lines: Vec<&str> = source.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let lineno = idx + 1;

        if let Some(caps) = JS_RANGE_COMPARISON.captures(line) {
            let num: f64 = caps[3].parse().unwrap_or(0.0);
            let bound = comparison_bound(&caps[2], num);
            push(&mut evidence, &caps[1], EvidenceKind::Range, path, lineno, Some(bound));
        }
        if let Some(caps) = JS_MIN_MAX_CALL.captures(line) {
            push(&mut evidence, &caps[1], EvidenceKind::Range, path, lineno, call_bound(line));
        }
        if let Some(caps) = JS_LENGTH_COMPARISON.captures(line) {
            let num: f64 = caps[3].parse().unwrap_or(0.0);
            let bound = comparison_bound(&caps[2], num);
            push(&mut evidence, &caps[1], EvidenceKind::Length, path, lineno, Some(bound));
        }
        if let Some(caps) = JS_SWITCH.captures(line) {
            let field = if caps[2].is_empty() { &caps[1] } else { &caps[2] };
            let values = scan_switch_values(&lines, idx);
            let value = if values.is_empty() { None } else { Some(EvidenceValue::Values(values)) };
            push(&mut evidence, field, EvidenceKind::Enum, path, lineno, value);
        }
        if let Some(caps) = FORMAT_CALL.captures(line) {
            if let Some(kind) = format_kind(&caps[2]) {
                push(&mut evidence, &caps[1], EvidenceKind::Format(kind), path, lineno, None);
            }
        }
        if let Some(caps) = JS_STATUS_CODE.captures(line) {
            let code: u16 = caps[1].parse().unwrap_or(0);
            push(&mut evidence, "status", EvidenceKind::StatusCodes, path, lineno, Some(EvidenceValue::Code(code)));
        }
        if ERROR_SHAPE.is_match(line) {
            push(&mut evidence, "error", EvidenceKind::ErrorShape, path, lineno, None);
        }
    }
    evidence
}

fn detect_go(path: &str, source: &str) -> Vec<ValidationEvidence> {
    let mut evidence = Vec::new();
    let lines: Vec<&str> = source.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let lineno = idx + 1;

        if let Some(caps) = GO_STRUCT_TAG_RANGE.captures(line) {
            push(&mut evidence, &caps[1], EvidenceKind::Range, path, lineno, tag_bound(&caps[2]));
        }
        if let Some(caps) = GO_LEN_COMPARISON.captures(line) {
            let num: f64 = caps[3].parse().unwrap_or(0.0);
            let bound = comparison_bound(&caps[2], num);
            push(&mut evidence, &caps[1], EvidenceKind::Length, path, lineno, Some(bound));
        }
        if let Some(caps) = GO_STRUCT_TAG_LENGTH.captures(line) {
            push(&mut evidence, &caps[1], EvidenceKind::Length, path, lineno, tag_exact_length(&caps[2]));
        }
        if let Some(caps) = GO_SWITCH.captures(line) {
            let values = scan_switch_values(&lines, idx);
            let value = if values.is_empty() { None } else { Some(EvidenceValue::Values(values)) };
            push(&mut evidence, &caps[1], EvidenceKind::Enum, path, lineno, value);
        }
        if let Some(caps) = GO_STRUCT_TAG_ONEOF.captures(line) {
            let values = case_tokens(&caps[2].replace(' ', ","));
            let value = if values.is_empty() { None } else { Some(EvidenceValue::Values(values)) };
            push(&mut evidence, &caps[1], EvidenceKind::Enum, path, lineno, value);
        }
        if let Some(caps) = GO_MAIL_PARSE.captures(line) {
            push(&mut evidence, &caps[1], EvidenceKind::Format(FormatKind::Email), path, lineno, None);
        }
        if let Some(caps) = GO_UUID_PARSE.captures(line) {
            push(&mut evidence, &caps[1], EvidenceKind::Format(FormatKind::Uuid), path, lineno, None);
        }
        if let Some(caps) = GO_URL_PARSE.captures(line) {
            push(&mut evidence, &caps[1], EvidenceKind::Format(FormatKind::Url), path, lineno, None);
        }
        if let Some(caps) = GO_TIME_PARSE.captures(line) {
            push(&mut evidence, &caps[1], EvidenceKind::Format(FormatKind::Iso8601), path, lineno, None);
        }
        if let Some(caps) = GO_STRUCT_TAG_FORMAT.captures(line) {
            if let Some(kind) = format_kind(&caps[2]) {
                push(&mut evidence, &caps[1], EvidenceKind::Format(kind), path, lineno, None);
            }
        }
        if let Some(caps) = GO_STATUS_CODE.captures(line) {
            let value = caps.get(1).and_then(|m| m.as_str().parse::<u16>().ok()).map(EvidenceValue::Code);
            push(&mut evidence, "status", EvidenceKind::StatusCodes, path, lineno, value);
        }
        if ERROR_SHAPE.is_match(line) {
            push(&mut evidence, "error", EvidenceKind::ErrorShape, path, lineno, None);
        }
    }
    evidence
}

fn format_kind(tag: &str) -> Option<FormatKind> {
    match tag.to_ascii_lowercase().as_str() {
        "email" => Some(FormatKind::Email),
        "uuid" => Some(FormatKind::Uuid),
        "url" => Some(FormatKind::Url),
        "iso8601" | "datetime" => Some(FormatKind::Iso8601),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_js_range_and_length() {
        let evidence = detect_validation_evidence(
            "a.ts",
            &Language::Typescript,
            "if (age < 0 || age > 120) throw new Error();\nif (name.length > 255) fail();\n",
        );
        assert!(evidence.iter().any(|e| e.kind == EvidenceKind::Range && e.field_name == "age"));
        assert!(evidence.iter().any(|e| e.kind == EvidenceKind::Length && e.field_name == "name"));
    }

    #[test]
    fn captures_numeric_bounds_from_comparisons() {
        let evidence = detect_validation_evidence(
            "a.ts",
            &Language::Typescript,
            "if (age < 0) fail();\nif (age > 120) fail();\n",
        );
        let bounds: Vec<_> = evidence
            .iter()
            .filter(|e| e.field_name == "age" && e.kind == EvidenceKind::Range)
            .filter_map(|e| e.value.clone())
            .collect();
        assert!(bounds.contains(&EvidenceValue::Bound { min: None, max: Some(0.0) }));
        assert!(bounds.contains(&EvidenceValue::Bound { min: Some(120.0), max: None }));
    }

    #[test]
    fn detects_js_format_call() {
        let evidence = detect_validation_evidence(
            "a.ts",
            &Language::Typescript,
            "if (!email.email()) fail();\n",
        );
        assert!(evidence
            .iter()
            .any(|e| matches!(e.kind, EvidenceKind::Format(FormatKind::Email)) && e.field_name == "email"));
    }

    #[test]
    fn detects_go_struct_tag_range_and_oneof() {
        let evidence = detect_validation_evidence(
            "a.go",
            &Language::Go,
            "Age int `validate:\"min=0,max=120\"`\nStatus string `validate:\"oneof=active inactive\"`\n",
        );
        let range = evidence.iter().find(|e| e.kind == EvidenceKind::Range && e.field_name == "Age").unwrap();
        assert_eq!(range.value, Some(EvidenceValue::Bound { min: Some(0.0), max: Some(120.0) }));

        let oneof = evidence.iter().find(|e| e.kind == EvidenceKind::Enum && e.field_name == "Status").unwrap();
        assert_eq!(
            oneof.value,
            Some(EvidenceValue::Values(vec!["active".to_string(), "inactive".to_string()]))
        );
    }

    #[test]
    fn detects_go_mail_parse_format_evidence() {
        let evidence = detect_validation_evidence(
            "a.go",
            &Language::Go,
            "if _, err := mail.ParseAddress(email); err != nil {\n",
        );
        assert!(evidence
            .iter()
            .any(|e| matches!(e.kind, EvidenceKind::Format(FormatKind::Email)) && e.field_name == "email"));
    }

    #[test]
    fn detects_status_code_and_error_shape() {
        let evidence = detect_validation_evidence(
            "a.ts",
            &Language::Typescript,
            "res.status(400).json({ error: { code: 'bad_request' } });\n",
        );
        let status = evidence.iter().find(|e| e.kind == EvidenceKind::StatusCodes).unwrap();
        assert_eq!(status.value, Some(EvidenceValue::Code(400)));
        assert!(evidence.iter().any(|e| e.kind == EvidenceKind::ErrorShape));
    }

    #[test]
    fn go_status_code_captures_literal_but_not_named_constant() {
        let evidence = detect_validation_evidence(
            "a.go",
            &Language::Go,
            "w.WriteHeader(400)\nw.WriteHeader(http.StatusOK)\n",
        );
        let codes: Vec<_> = evidence.iter().filter(|e| e.kind == EvidenceKind::StatusCodes).collect();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].value, Some(EvidenceValue::Code(400)));
        assert_eq!(codes[1].value, None);
    }

    #[test]
    fn switch_case_literals_become_enum_values() {
        let evidence = detect_validation_evidence(
            "a.ts",
            &Language::Typescript,
            "switch (status) {\ncase \"active\":\nbreak;\ncase \"inactive\":\nbreak;\n}\n",
        );
        let e = evidence.iter().find(|e| e.kind == EvidenceKind::Enum).unwrap();
        assert_eq!(
            e.value,
            Some(EvidenceValue::Values(vec!["active".to_string(), "inactive".to_string()]))
        );
    }
}
