//! `RunReport` (§3): the final payload of one engine run.

use serde::{Deserialize, Serialize};

use super::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(rename = "totalViolations")]
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    #[serde(rename = "filesScanned")]
    pub files_scanned: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPayload {
    pub enabled: bool,
    pub added: Vec<Violation>,
    pub resolved: Vec<Violation>,
    pub summary: DiffSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub violations: Vec<Violation>,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffPayload>,
}

impl RunReport {
    pub fn new(violations: Vec<Violation>, elapsed_ms: u64, files_scanned: usize) -> Self {
        let errors = violations
            .iter()
            .filter(|v| v.severity == super::Severity::Error)
            .count();
        let warnings = violations.len() - errors;
        Self {
            summary: RunSummary {
                total: violations.len(),
                errors,
                warnings,
                elapsed_ms,
                files_scanned,
            },
            violations,
            diff: None,
        }
    }
}
