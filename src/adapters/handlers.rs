//! HTTP handler detection (§4.1): regex-level recognition of route
//! registrations, used only by C5 to match manifest endpoints to code.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{HandlerBinding, Language};

static JS_ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\.(get|post|put|delete|patch|head|options)\s*\(\s*["'`]([^"'`]+)["'`]"#)
        .unwrap()
});

static GO_HANDLE_FUNC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.HandleFunc\s*\(\s*"([^"]+)""#).unwrap()
});

static GO_METHODS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.Methods\s*\(\s*"([A-Z]+)""#).unwrap());

static GO_ROUTER_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\.(get|post|put|delete|patch|head|options)\s*\(\s*"([^"]+)""#).unwrap()
});

/// Detect route registrations per language (spec §4.1 examples:
/// `app.get("PATH", …)`, `http.HandleFunc("PATH", …)`).
pub fn detect_handlers(path: &str, language: &Language, source: &str) -> Vec<HandlerBinding> {
    match language {
        Language::Typescript | Language::Javascript => detect_js_handlers(path, source),
        Language::Go => detect_go_handlers(path, source),
        _ => Vec::new(),
    }
}

fn detect_js_handlers(path: &str, source: &str) -> Vec<HandlerBinding> {
    let mut handlers = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if let Some(caps) = JS_ROUTE.captures(line) {
            handlers.push(HandlerBinding {
                method: caps[1].to_ascii_uppercase(),
                path: caps[2].to_string(),
                file: path.to_string(),
                line: idx + 1,
            });
        }
    }
    handlers
}

fn detect_go_handlers(path: &str, source: &str) -> Vec<HandlerBinding> {
    let mut handlers = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if let Some(caps) = GO_HANDLE_FUNC.captures(line) {
            // A chained `.Methods("GET")` on the same line (gorilla/mux
            // style) narrows the method; otherwise default to a wildcard
            // `ANY` binding that matches every manifest method.
            let method = GO_METHODS
                .captures(line)
                .map(|m| m[1].to_string())
                .unwrap_or_else(|| "ANY".to_string());
            handlers.push(HandlerBinding {
                method,
                path: caps[1].to_string(),
                file: path.to_string(),
                line: idx + 1,
            });
        } else if let Some(caps) = GO_ROUTER_METHOD.captures(line) {
            handlers.push(HandlerBinding {
                method: caps[1].to_ascii_uppercase(),
                path: caps[2].to_string(),
                file: path.to_string(),
                line: idx + 1,
            });
        }
    }
    handlers
}

/// Normalize path-parameter placeholders so `:name`, `{name}`, `${name}`,
/// and `%s` are treated as equivalent positional placeholders (§4.5).
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' => {
                // `:name` -> consume identifier chars
                while matches!(chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
                    chars.next();
                }
                normalized.push('*');
            }
            '{' => {
                while let Some(c) = chars.next() {
                    if c == '}' {
                        break;
                    }
                }
                normalized.push('*');
            }
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '}' {
                        break;
                    }
                }
                normalized.push('*');
            }
            '%' if matches!(chars.peek(), Some('s' | 'd' | 'v')) => {
                chars.next();
                normalized.push('*');
            }
            other => normalized.push(other),
        }
    }
    normalized
}
