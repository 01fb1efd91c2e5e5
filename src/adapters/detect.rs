//! File-extension language detection and binary-content sniffing (§4.1/§6).

use std::path::Path;

use crate::model::Language;

/// Known binary extensions that short-circuit the NUL-byte sniff.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "pdf", "zip", "gz", "tar", "woff", "woff2",
    "ttf", "otf", "so", "dylib", "dll", "exe", "wasm", "class", "jar",
];

/// First 8 KiB is the sniff window (§4.1).
const SNIFF_WINDOW: usize = 8192;

pub fn is_binary(path: &str, source: &[u8]) -> bool {
    if let Some(ext) = extension_of(path) {
        if BINARY_EXTENSIONS.contains(&ext.as_str()) {
            return true;
        }
    }
    let window = &source[..source.len().min(SNIFF_WINDOW)];
    window.contains(&0u8)
}

fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Default generated-file ignore list (§4.6), shared by C1 (nothing to
/// reject here yet, just available) and C6 (skip before a file ever reaches
/// an adapter).
const GENERATED_SUFFIXES: &[&str] = &[".generated.ts", ".generated.js", ".generated.go", ".pb.go", ".pb.ts"];

const VENDOR_DIR_NAMES: &[&str] = &["node_modules", "vendor", "dist", "build", "target", ".git"];

pub fn is_generated_file(path: &str) -> bool {
    let base = Path::new(path).file_name().and_then(|f| f.to_str()).unwrap_or(path);
    if GENERATED_SUFFIXES.iter().any(|suffix| base.ends_with(suffix)) {
        return true;
    }
    Path::new(path)
        .components()
        .any(|c| matches!(c.as_os_str().to_str(), Some(name) if VENDOR_DIR_NAMES.contains(&name)))
}

/// Map a file extension to its normalized language tag (§6 language table).
/// `tsx` collapses into `typescript`, `jsx` into `javascript`.
pub fn detect_language(path: &str) -> Language {
    match extension_of(path).as_deref() {
        Some("ts") | Some("tsx") => Language::Typescript,
        Some("js") | Some("jsx") => Language::Javascript,
        Some("go") => Language::Go,
        Some("py") => Language::Python,
        Some("java") => Language::Java,
        Some("kt") => Language::Kotlin,
        Some(other) => Language::Other(other.to_string()),
        None => Language::Other(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_typescript_family() {
        assert_eq!(detect_language("a.ts"), Language::Typescript);
        assert_eq!(detect_language("a.tsx"), Language::Typescript);
        assert_eq!(detect_language("a.js"), Language::Javascript);
        assert_eq!(detect_language("a.jsx"), Language::Javascript);
    }

    #[test]
    fn detects_go_python_java_kotlin() {
        assert_eq!(detect_language("a.go"), Language::Go);
        assert_eq!(detect_language("a.py"), Language::Python);
        assert_eq!(detect_language("a.java"), Language::Java);
        assert_eq!(detect_language("a.kt"), Language::Kotlin);
    }

    #[test]
    fn unknown_extension_is_other() {
        assert_eq!(detect_language("a.rs"), Language::Other("rs".into()));
    }

    #[test]
    fn known_binary_extension_is_binary_without_sniff() {
        assert!(is_binary("logo.png", b"not actually binary content"));
    }

    #[test]
    fn nul_byte_in_first_8kib_is_binary() {
        let mut bytes = vec![b'a'; 100];
        bytes[50] = 0;
        assert!(is_binary("data.bin", &bytes));
    }

    #[test]
    fn text_file_is_not_binary() {
        assert!(!is_binary("a.go", b"package main\n"));
    }

    #[test]
    fn nul_byte_past_sniff_window_is_ignored() {
        let mut bytes = vec![b'a'; SNIFF_WINDOW + 10];
        bytes[SNIFF_WINDOW + 5] = 0;
        assert!(!is_binary("a.txt", &bytes));
    }

    #[test]
    fn recognizes_generated_suffixes() {
        assert!(is_generated_file("api.pb.go"));
        assert!(is_generated_file("client.generated.ts"));
        assert!(!is_generated_file("client.ts"));
    }

    #[test]
    fn recognizes_vendor_directories() {
        assert!(is_generated_file("node_modules/pkg/index.js"));
        assert!(is_generated_file("vendor/lib/thing.go"));
        assert!(!is_generated_file("src/vendor-utils.go"));
    }
}
