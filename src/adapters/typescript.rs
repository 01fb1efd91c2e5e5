//! Export scanning for the `{typescript, javascript, tsx, jsx}` family (§4.1).
//!
//! Line-oriented and regex-based (Design Note §9: "heuristic extraction vs.
//! AST"); a real parser may replace this without changing the `FileModel`
//! contract.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DataShape, ExportKind, ExportSymbol, ShapeField};

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//.*$").unwrap());

static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s+(?:async\s+)?function\s*\*?\s+([A-Za-z_$][\w$]*)").unwrap());
static CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s+const\s+([A-Za-z_$][\w$]*)").unwrap());
static CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s+(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)").unwrap());
static TYPE_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s+(type|interface|enum)\s+([A-Za-z_$][\w$]*)").unwrap());
static DEFAULT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^export\s+default\b").unwrap());
static BRACE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s*\{([^}]*)\}").unwrap());

/// Strip a trailing `// ...` line comment. Heuristic: does not understand
/// string/template literals (§4.1, §9).
fn strip_line_comment(line: &str) -> &str {
    match LINE_COMMENT.find(line) {
        Some(m) => &line[..m.start()],
        None => line,
    }
}

pub fn extract_exports(source: &str) -> Vec<ExportSymbol> {
    let mut exports = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let start_line = idx + 1;
        let line = strip_line_comment(raw_line).trim();
        if line.is_empty() || !line.starts_with("export") {
            continue;
        }

        if let Some(caps) = FUNCTION.captures(line) {
            exports.push(ExportSymbol::new(&caps[1], ExportKind::Function, start_line));
            continue;
        }
        if let Some(caps) = CONST.captures(line) {
            exports.push(ExportSymbol::new(&caps[1], ExportKind::Constant, start_line));
            continue;
        }
        if let Some(caps) = CLASS.captures(line) {
            exports.push(ExportSymbol::new(&caps[1], ExportKind::Class, start_line));
            continue;
        }
        if let Some(caps) = TYPE_LIKE.captures(line) {
            exports.push(ExportSymbol::new(&caps[2], ExportKind::Type, start_line));
            continue;
        }
        if DEFAULT.is_match(line) {
            exports.push(ExportSymbol::new("default", ExportKind::Default, start_line));
            continue;
        }
        if let Some(caps) = BRACE_LIST.captures(line) {
            for item in caps[1].split(',') {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                // `X as Y` aliases: the alias name is the exported name (§4.1).
                let name = match item.split_once(" as ") {
                    Some((_, alias)) => alias.trim(),
                    None => item,
                };
                if name.is_empty() {
                    continue;
                }
                exports.push(ExportSymbol::new(name, ExportKind::Value, start_line));
            }
        }
    }

    exports
}

static SHAPE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s+(?:interface|type)\s+([A-Za-z_$][\w$]*)\b").unwrap());
static SHAPE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:readonly\s+)?([A-Za-z_$][\w$]*)(\?)?\s*:\s*([^;,{]+)[;,]?\s*$").unwrap());

/// Extract `export interface`/`export type` object bodies as data shapes
/// (§4.5 field-presence, type-mapping, required-ness). A line-oriented
/// brace-depth scan (§9), not a type-checker: nested object literals and
/// multi-line union types inside a field's type are not modeled, matching
/// the same degrade-silently posture as export scanning above.
pub fn extract_shapes(path: &str, source: &str) -> Vec<DataShape> {
    let mut shapes = Vec::new();
    let mut current: Option<DataShape> = None;
    let mut pending_name: Option<(String, usize)> = None;
    let mut depth = 0i32;

    for (idx, raw_line) in source.lines().enumerate() {
        let lineno = idx + 1;
        let line = strip_line_comment(raw_line).trim();

        if current.is_none() {
            if let Some((name, start)) = pending_name.take() {
                if line.starts_with('{') {
                    current = Some(DataShape { name, file: path.to_string(), line: start, fields: Vec::new() });
                    depth = 1;
                    continue;
                }
                // Not an object body (e.g. `type Foo = string;`); drop it.
            }
            if let Some(caps) = SHAPE_HEADER.captures(line) {
                let name = caps[1].to_string();
                if let Some(pos) = line.find('{') {
                    let after = &line[pos..];
                    let opened = after.matches('{').count() as i32 - after.matches('}').count() as i32;
                    if opened > 0 {
                        current = Some(DataShape { name, file: path.to_string(), line: lineno, fields: Vec::new() });
                        depth = opened;
                    }
                } else {
                    pending_name = Some((name, lineno));
                }
            }
            continue;
        }

        depth += line.matches('{').count() as i32;
        depth -= line.matches('}').count() as i32;
        if depth <= 0 {
            shapes.push(current.take().unwrap());
            continue;
        }

        if let Some(caps) = SHAPE_FIELD.captures(line) {
            current.as_mut().unwrap().fields.push(ShapeField {
                name: caps[1].to_string(),
                tag_name: None,
                type_name: caps[3].trim().trim_end_matches(',').to_string(),
                required: caps.get(2).is_none(),
            });
        }
    }

    shapes
}
