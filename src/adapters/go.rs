//! Export scanning for `go` (§4.1): `func NAME(`, `func (recv) NAME(`,
//! `type NAME `, `const NAME` / `var NAME`; only identifiers whose first
//! rune is uppercase are considered exports.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DataShape, ExportKind, ExportSymbol, ShapeField};

static FUNC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^func\s+(?:\([^)]*\)\s+)?([A-Za-z_]\w*)\s*\(").unwrap()
});
static TYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^type\s+([A-Za-z_]\w*)\s").unwrap());
static CONST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^const\s+([A-Za-z_]\w*)").unwrap());
static VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^var\s+([A-Za-z_]\w*)").unwrap());

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

pub fn extract_exports(source: &str) -> Vec<ExportSymbol> {
    let mut exports = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let start_line = idx + 1;
        let line = raw_line.trim();

        if let Some(caps) = FUNC.captures(line) {
            let name = &caps[1];
            if is_exported(name) {
                exports.push(ExportSymbol::new(name, ExportKind::Function, start_line));
            }
            continue;
        }
        if let Some(caps) = TYPE.captures(line) {
            let name = &caps[1];
            if is_exported(name) {
                exports.push(ExportSymbol::new(name, ExportKind::Type, start_line));
            }
            continue;
        }
        if let Some(caps) = CONST.captures(line) {
            let name = &caps[1];
            if is_exported(name) {
                exports.push(ExportSymbol::new(name, ExportKind::Constant, start_line));
            }
            continue;
        }
        if let Some(caps) = VAR.captures(line) {
            let name = &caps[1];
            if is_exported(name) {
                exports.push(ExportSymbol::new(name, ExportKind::Value, start_line));
            }
        }
    }

    exports
}

static STRUCT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^type\s+([A-Za-z_]\w*)\s+struct\s*\{").unwrap());
static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)\s+(\*?[\w.\[\]]+)\s*(`[^`]*`)?\s*(?://.*)?$").unwrap());
static JSON_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"json:"([^",]+)(,[^"]*)?""#).unwrap());

/// Extract `type NAME struct { ... }` field lists as data shapes (§4.5
/// field-presence, type-mapping, required-ness). Identity for JSON purposes
/// follows the `json:"..."` tag when present, the Go field name otherwise.
/// Unexported fields and fields tagged `json:"-"` never serialize, so they
/// never count toward manifest conformance.
pub fn extract_shapes(path: &str, source: &str) -> Vec<DataShape> {
    let mut shapes = Vec::new();
    let mut current: Option<DataShape> = None;

    for (idx, raw_line) in source.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw_line.trim();

        if current.is_none() {
            if let Some(caps) = STRUCT_HEADER.captures(line) {
                current = Some(DataShape { name: caps[1].to_string(), file: path.to_string(), line: lineno, fields: Vec::new() });
            }
            continue;
        }

        if line == "}" {
            shapes.push(current.take().unwrap());
            continue;
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(caps) = FIELD.captures(line) {
            let name = &caps[1];
            if !is_exported(name) {
                continue;
            }
            let type_name = caps[2].to_string();
            let tag = caps.get(3).map(|m| m.as_str());
            let tag_name = tag.and_then(|t| JSON_TAG.captures(t)).map(|c| c[1].to_string());
            if tag_name.as_deref() == Some("-") {
                continue;
            }
            let omitempty = tag.is_some_and(|t| t.contains("omitempty"));
            let required = !type_name.starts_with('*') && !omitempty;

            current.as_mut().unwrap().fields.push(ShapeField {
                name: name.to_string(),
                tag_name,
                type_name,
                required,
            });
        }
    }

    shapes
}
