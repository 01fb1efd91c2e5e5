//! The language-neutral `FileModel` produced by adapters (C1).

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Normalized language tag. `tsx`/`jsx` collapse into `typescript`/`javascript`
/// per the language table (§6).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Typescript,
    Javascript,
    Go,
    Python,
    Java,
    Kotlin,
    /// Any extension not in the v1 adapter table; export scanning degrades
    /// silently for these (spec §4.1: "export list may be empty").
    Other(String),
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Typescript => write!(f, "typescript"),
            Language::Javascript => write!(f, "javascript"),
            Language::Go => write!(f, "go"),
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
            Language::Kotlin => write!(f, "kotlin"),
            Language::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// Kind of an exported symbol, per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
    Type,
    Constant,
    Default,
    Value,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportKind::Function => "function",
            ExportKind::Class => "class",
            ExportKind::Type => "type",
            ExportKind::Constant => "constant",
            ExportKind::Default => "default",
            ExportKind::Value => "value",
        };
        write!(f, "{s}")
    }
}

/// One exported symbol (§3 `ExportSymbol`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSymbol {
    pub name: String,
    pub kind: ExportKind,
    pub start_line: usize,
}

impl ExportSymbol {
    pub fn new(name: impl Into<String>, kind: ExportKind, start_line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            start_line,
        }
    }

    /// Dedup key per spec §4.1: "(name, kind, line)".
    fn dedup_key(&self) -> (&str, ExportKind, usize) {
        (&self.name, self.kind, self.start_line)
    }
}

/// Sort and dedup a list of exports per spec §4.1: "Duplicates are removed by
/// the key (name, kind, line). Results are sorted by (line, name, kind)."
pub fn normalize_exports(mut exports: Vec<ExportSymbol>) -> Vec<ExportSymbol> {
    exports.sort_by(|a, b| {
        a.start_line
            .cmp(&b.start_line)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.kind.cmp(&b.kind))
    });
    exports.dedup_by_key(|e| e.dedup_key());
    exports
}

/// A detected HTTP route registration (§4.1 handler heuristics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerBinding {
    pub method: String,
    pub path: String,
    pub file: String,
    pub line: usize,
}

/// The format constraint recognized on a string field, shared between
/// `model::ValidationEvidence` (what adapters saw) and `manifest::Field`
/// (what the contract declares) so C5 can compare them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Email,
    Uuid,
    Iso8601,
    Url,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormatKind::Email => "email",
            FormatKind::Uuid => "uuid",
            FormatKind::Iso8601 => "iso8601",
            FormatKind::Url => "url",
        };
        write!(f, "{s}")
    }
}

/// Kind of validation constraint an adapter found evidence for (§4.1/§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceKind {
    Range,
    Enum,
    Format(FormatKind),
    Length,
    ErrorShape,
    StatusCodes,
}

/// The literal value captured alongside some evidence kinds, when the
/// adapter's regex could pull one out. Never required: a `Range`/`Length`
/// comparison against a variable instead of a literal, or a `switch` over
/// bare identifiers, still counts as evidence with `value: None` (§4.1
/// degrades silently rather than dropping the finding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "data")]
pub enum EvidenceValue {
    /// `Range`/`Length` bound(s) read off a comparison or struct tag.
    Bound { min: Option<f64>, max: Option<f64> },
    /// `Enum` evidence: the literal values seen in a `switch`/`oneof`.
    Values(Vec<String>),
    /// `StatusCodes` evidence: the literal numeric code, when not hidden
    /// behind a named constant like `http.StatusOK`.
    Code(u16),
}

/// One piece of evidence that a field's constraint is enforced somewhere in
/// a file: "Adapters never decide conformance — they only expose evidence."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEvidence {
    pub field_name: String,
    pub kind: EvidenceKind,
    pub file: String,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<EvidenceValue>,
}

/// One field inside a struct/interface/type body, as declared in code (§4.5
/// field-presence, type-mapping, and required-ness checks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeField {
    pub name: String,
    /// Serialization-tag name when the language has one (Go `json:"..."`);
    /// a field matches a manifest field by this name OR by `name`.
    pub tag_name: Option<String>,
    /// Raw code-side type text, e.g. `string`, `*int64`, `'a' | 'b'`.
    pub type_name: String,
    pub required: bool,
}

/// A struct/interface/type declaration with its fields, extracted from a
/// data shape the code defines (§4.5: compared against a contract's fields
/// when the shape's file falls under a binding's `type_paths`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataShape {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub fields: Vec<ShapeField>,
}

/// A uniform per-file model: path, detected language, source bytes,
/// exported symbols, handler declarations, detected validation calls (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileModel {
    pub path: String,
    pub language: Language,
    #[serde(skip)]
    pub source: Vec<u8>,
    pub is_test_file: bool,
    pub exports: Vec<ExportSymbol>,
    pub handlers: Vec<HandlerBinding>,
    pub validation_evidence: Vec<ValidationEvidence>,
    pub shapes: Vec<DataShape>,
}

impl FileModel {
    pub fn new(path: impl Into<String>, language: Language, source: Vec<u8>) -> Self {
        let path = path.into();
        let is_test_file = infer_test_file(&path, &language);
        Self {
            path,
            language,
            source,
            is_test_file,
            exports: Vec::new(),
            handlers: Vec::new(),
            validation_evidence: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Source bytes decoded lossily; line numbers are always derived from
    /// `source`, never from this decoded view, so non-UTF8 bytes never shift
    /// offsets (spec §3: "source length and byte offsets ... are the authority").
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.source)
    }
}

/// Per-language default test-file suffix recognition (§6 language table),
/// used only as a hint; `CONV-test-file-location` can override via options.
fn infer_test_file(path: &str, language: &Language) -> bool {
    let base = Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(path);
    match language {
        Language::Typescript | Language::Javascript => {
            base.ends_with(".test.ts")
                || base.ends_with(".test.tsx")
                || base.ends_with(".spec.ts")
                || base.ends_with(".spec.tsx")
                || base.ends_with(".test.js")
                || base.ends_with(".test.jsx")
                || base.ends_with(".spec.js")
                || base.ends_with(".spec.jsx")
        }
        Language::Go => base.ends_with("_test.go"),
        Language::Python => base.ends_with("_test.py") || base.starts_with("test_"),
        Language::Java => base.ends_with("Test.java"),
        Language::Kotlin => false,
        Language::Other(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_exports_sorts_by_line_name_kind() {
        let exports = vec![
            ExportSymbol::new("b", ExportKind::Function, 5),
            ExportSymbol::new("a", ExportKind::Function, 5),
            ExportSymbol::new("z", ExportKind::Function, 1),
        ];
        let sorted = normalize_exports(exports);
        assert_eq!(sorted[0].name, "z");
        assert_eq!(sorted[1].name, "a");
        assert_eq!(sorted[2].name, "b");
    }

    #[test]
    fn normalize_exports_dedups_by_name_kind_line() {
        let exports = vec![
            ExportSymbol::new("a", ExportKind::Function, 1),
            ExportSymbol::new("a", ExportKind::Function, 1),
            ExportSymbol::new("a", ExportKind::Constant, 1),
        ];
        let deduped = normalize_exports(exports);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn infers_typescript_test_file() {
        assert!(infer_test_file(
            "src/foo.test.tsx",
            &Language::Typescript
        ));
        assert!(!infer_test_file("src/foo.tsx", &Language::Typescript));
    }

    #[test]
    fn infers_go_test_file() {
        assert!(infer_test_file("pkg/foo_test.go", &Language::Go));
        assert!(!infer_test_file("pkg/foo.go", &Language::Go));
    }

    #[test]
    fn text_decodes_lossily_without_shifting_source_len() {
        let model = FileModel::new("a.go", Language::Go, vec![0x66, 0x6f, 0xff, 0x6f]);
        assert_eq!(model.source.len(), 4);
        assert!(model.text().contains('\u{FFFD}'));
    }
}
