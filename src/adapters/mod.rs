//! Language adapters (C1): given `(path, bytes)`, produce a `FileModel`
//! without requiring a full parser (spec §4.1, Design Note §9: "heuristic
//! extraction vs. AST").
//!
//! Adapters are free functions selected by a small dispatch table keyed by
//! `Language`, not a trait-object hierarchy.

mod detect;
mod go;
pub(crate) mod handlers;
mod typescript;
mod validation;

pub use detect::{detect_language, is_binary, is_generated_file};

use anyhow::{Result, anyhow};

use crate::model::{FileModel, Language, normalize_exports};

/// Build a `FileModel` for one file. Fails only when the content looks
/// binary (spec §4.1: "Binary files ... cause the `inspect` entry point to
/// fail with a 'binary file' error").
pub fn inspect(path: &str, source: Vec<u8>) -> Result<FileModel> {
    if is_binary(path, &source) {
        return Err(anyhow!("binary file: {path}"));
    }

    let language = detect_language(path);
    let mut model = FileModel::new(path, language.clone(), source);

    let text = model.text().into_owned();
    model.exports = normalize_exports(match &language {
        Language::Typescript | Language::Javascript => typescript::extract_exports(&text),
        Language::Go => go::extract_exports(&text),
        // Secondary languages (§4.1: "For other languages: export list may
        // be empty; rules that require exports degrade silently").
        Language::Python | Language::Java | Language::Kotlin | Language::Other(_) => Vec::new(),
    });

    model.handlers = handlers::detect_handlers(path, &language, &text);
    model.validation_evidence = validation::detect_validation_evidence(path, &language, &text);
    model.shapes = match &language {
        Language::Typescript | Language::Javascript => typescript::extract_shapes(path, &text),
        Language::Go => go::extract_shapes(path, &text),
        Language::Python | Language::Java | Language::Kotlin | Language::Other(_) => Vec::new(),
    };

    Ok(model)
}
