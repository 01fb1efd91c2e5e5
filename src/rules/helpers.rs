//! Shared naming-style helpers for the `CONV-*` rules (§4.3, §6).

use std::sync::LazyLock;

use regex::Regex;

static KEBAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").unwrap());
static SNAKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").unwrap());
static CAMEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());
static PASCAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());
static UPPER_SNAKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$").unwrap());

/// A naming style recognized by `CONV-file-naming` / `CONV-export-naming` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Kebab,
    Snake,
    Camel,
    Pascal,
    UpperSnake,
}

impl Style {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "kebab-case" => Some(Style::Kebab),
            "snake_case" => Some(Style::Snake),
            "camelCase" => Some(Style::Camel),
            "PascalCase" => Some(Style::Pascal),
            "UPPER_SNAKE_CASE" => Some(Style::UpperSnake),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Style::Kebab => "kebab-case",
            Style::Snake => "snake_case",
            Style::Camel => "camelCase",
            Style::Pascal => "PascalCase",
            Style::UpperSnake => "UPPER_SNAKE_CASE",
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Style::Kebab => KEBAB.is_match(name),
            Style::Snake => SNAKE.is_match(name),
            Style::Camel => CAMEL.is_match(name),
            Style::Pascal => PASCAL.is_match(name),
            Style::UpperSnake => UPPER_SNAKE.is_match(name),
        }
    }

    pub fn apply(&self, words: &[String]) -> String {
        match self {
            Style::Kebab => words.iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("-"),
            Style::Snake => words.iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("_"),
            Style::UpperSnake => words
                .iter()
                .map(|w| w.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            Style::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            Style::Pascal => words.iter().map(|w| capitalize(w)).collect(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Split an identifier into words on hyphen/underscore/case transitions,
/// with acronym handling: a run of uppercase letters followed by a
/// lowercase letter splits at the last uppercase letter (`HTTPClient` ->
/// `[http, client]`, `getAPIKey` -> `[get, api, key]`) (§4.3).
pub fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = *current.chars().last().unwrap();
            let starts_new_word = if prev.is_lowercase() && c.is_uppercase() {
                true
            } else if prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_lowercase())
            {
                // Acronym boundary: "HTTPClient" at the 'C' before "lient".
                true
            } else if prev.is_alphabetic() && c.is_ascii_digit() {
                false
            } else {
                false
            };
            if starts_new_word {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.into_iter().map(|w| w.to_lowercase()).filter(|w| !w.is_empty()).collect()
}

/// Known multi-part test-file suffixes, checked longest-first so
/// `.test.tsx` is stripped whole rather than leaving a dangling `.test`.
pub const KNOWN_TEST_SUFFIXES: &[&str] = &[
    ".test.tsx", ".test.ts", ".test.jsx", ".test.js", ".spec.tsx", ".spec.ts", ".spec.jsx",
    ".spec.js", "_test.go", "_test.py", "Test.java",
];

/// Strip a known test-file suffix (and `.d.ts`) from a base name, returning
/// `(stem, suffix)`. `suffix` is empty when none matched (§4.3).
pub fn strip_known_suffix(base_name: &str) -> (&str, &str) {
    if let Some(stem) = base_name.strip_suffix(".d.ts") {
        return (stem, ".d.ts");
    }
    for suffix in KNOWN_TEST_SUFFIXES {
        if let Some(stem) = base_name.strip_suffix(suffix) {
            return (stem, suffix);
        }
    }
    match base_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, &base_name[stem.len()..stem.len() + 1 + ext.len()]),
        None => (base_name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_acronym_prefixed_identifier() {
        assert_eq!(split_words("HTTPClient"), vec!["http", "client"]);
    }

    #[test]
    fn splits_acronym_in_middle() {
        assert_eq!(split_words("getAPIKey"), vec!["get", "api", "key"]);
    }

    #[test]
    fn splits_kebab_and_snake() {
        assert_eq!(split_words("user-service"), vec!["user", "service"]);
        assert_eq!(split_words("user_service"), vec!["user", "service"]);
    }

    #[test]
    fn applies_styles() {
        let words = vec!["user".to_string(), "service".to_string()];
        assert_eq!(Style::Kebab.apply(&words), "user-service");
        assert_eq!(Style::Snake.apply(&words), "user_service");
        assert_eq!(Style::Camel.apply(&words), "userService");
        assert_eq!(Style::Pascal.apply(&words), "UserService");
        assert_eq!(Style::UpperSnake.apply(&words), "USER_SERVICE");
    }

    #[test]
    fn strips_known_test_suffix() {
        assert_eq!(strip_known_suffix("foo.test.tsx"), ("foo", ".test.tsx"));
        assert_eq!(strip_known_suffix("foo_test.go"), ("foo", "_test.go"));
        assert_eq!(strip_known_suffix("FooTest.java"), ("Foo", "Test.java"));
        assert_eq!(strip_known_suffix("foo.d.ts"), ("foo", ".d.ts"));
        assert_eq!(strip_known_suffix("foo.ts"), ("foo", ".ts"));
    }

    #[test]
    fn style_matches_recognize_valid_names() {
        assert!(Style::Kebab.matches("user-service"));
        assert!(!Style::Kebab.matches("UserService"));
        assert!(Style::Pascal.matches("UserService"));
        assert!(Style::Camel.matches("userService"));
        assert!(Style::UpperSnake.matches("MAX_RETRIES"));
    }
}
