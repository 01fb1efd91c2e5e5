//! Core data model shared by every component: `FileModel`, `Violation`, `RunReport`.

mod file_model;
mod run_report;
mod violation;

pub use file_model::{
    DataShape, EvidenceKind, EvidenceValue, ExportKind, ExportSymbol, FileModel, FormatKind,
    HandlerBinding, Language, ShapeField, ValidationEvidence, normalize_exports,
};
pub use run_report::{DiffPayload, DiffSummary, RunReport, RunSummary};
pub use violation::{Severity, SuggestedFix, Violation, ViolationContext};
