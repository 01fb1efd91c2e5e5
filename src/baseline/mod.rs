//! Baseline fingerprinting and diff mode (C7, §4.7).

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::StrictureError;
use crate::model::{DiffPayload, DiffSummary, Violation};

/// The persisted fingerprint of one violation (§3: "(ruleId, filePath-relative,
/// startLine-or-structural-key, message)").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint {
    pub rule_id: String,
    pub file_path: String,
    pub start_line: usize,
    pub message: String,
}

impl Fingerprint {
    fn from_violation(violation: &Violation) -> Self {
        let (rule_id, file_path, start_line, message) = violation.fingerprint();
        Self {
            rule_id,
            file_path,
            start_line,
            message,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BaselineFile {
    fingerprints: BTreeSet<Fingerprint>,
}

/// Load a baseline file. A missing file is not an error — the caller decides
/// whether that means "bootstrap" or "no baseline configured".
pub fn load(path: &Path) -> anyhow::Result<Option<BTreeSet<Fingerprint>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|source| StrictureError::Io {
            path: path.display().to_string(),
            source,
        })
        .with_context(|| format!("reading baseline {}", path.display()))?;
    let parsed: BaselineFile = serde_json::from_str(&content).map_err(|e| StrictureError::Parse {
        path: path.display().to_string(),
        detail: format!("malformed baseline: {e}"),
    })?;
    Ok(Some(parsed.fingerprints))
}

/// Atomically write the current violation set as a new baseline (write the
/// sibling temp file, then rename over the target — §4.7: "bootstrap writes
/// the current set atomically").
pub fn bootstrap(path: &Path, violations: &[Violation]) -> anyhow::Result<()> {
    let fingerprints: BTreeSet<Fingerprint> = violations.iter().map(Fingerprint::from_violation).collect();
    let payload = BaselineFile { fingerprints };
    let serialized = serde_json::to_string_pretty(&payload).context("serializing baseline")?;

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, &serialized)
        .with_context(|| format!("writing temporary baseline {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("renaming baseline into place at {}", path.display()))?;
    Ok(())
}

/// Filter `violations` against a loaded baseline (non-diff mode): only
/// violations absent from the baseline remain.
pub fn filter_baselined(violations: Vec<Violation>, baseline: &BTreeSet<Fingerprint>) -> Vec<Violation> {
    violations
        .into_iter()
        .filter(|v| !baseline.contains(&Fingerprint::from_violation(v)))
        .collect()
}

/// Compute `added = current \ baseline` and `resolved = baseline \ current`
/// for `--diff` mode (§4.7). `resolved` violations carry no current message,
/// so they're represented as zero-severity placeholders reconstructed from
/// their fingerprint for the JSON payload.
pub fn diff(current: &[Violation], baseline: &BTreeSet<Fingerprint>) -> DiffPayload {
    let current_fingerprints: BTreeSet<Fingerprint> = current.iter().map(Fingerprint::from_violation).collect();

    let added: Vec<Violation> = current
        .iter()
        .filter(|v| !baseline.contains(&Fingerprint::from_violation(v)))
        .cloned()
        .collect();

    let resolved: Vec<Violation> = baseline
        .iter()
        .filter(|fp| !current_fingerprints.contains(fp))
        .map(|fp| {
            Violation::new(
                fp.rule_id.clone(),
                crate::model::Severity::Warn,
                fp.message.clone(),
                fp.file_path.clone(),
                fp.start_line,
            )
        })
        .collect();

    let summary = DiffSummary {
        added: added.len(),
        resolved: resolved.len(),
    };

    DiffPayload {
        enabled: true,
        added,
        resolved,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use tempfile::tempdir;

    #[test]
    fn bootstrap_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let violations = vec![
            Violation::new("CONV-a", Severity::Error, "m", "a.ts", 1),
            Violation::new("CONV-b", Severity::Error, "m", "b.ts", 2),
        ];
        bootstrap(&path, &violations).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn filter_baselined_drops_matching_fingerprints() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let baselined = vec![Violation::new("CONV-a", Severity::Error, "m", "a.ts", 1)];
        bootstrap(&path, &baselined).unwrap();
        let baseline = load(&path).unwrap().unwrap();

        let current = vec![
            Violation::new("CONV-a", Severity::Error, "m", "a.ts", 1),
            Violation::new("CONV-a", Severity::Error, "m", "c.ts", 1),
        ];
        let filtered = filter_baselined(current, &baseline);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].file_path, "c.ts");
    }

    #[test]
    fn diff_reports_added_and_resolved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let baselined = vec![
            Violation::new("CONV-a", Severity::Error, "m", "a.ts", 1),
            Violation::new("CONV-a", Severity::Error, "m", "b.ts", 1),
        ];
        bootstrap(&path, &baselined).unwrap();
        let baseline = load(&path).unwrap().unwrap();

        let current = vec![
            Violation::new("CONV-a", Severity::Error, "m", "a.ts", 1),
            Violation::new("CONV-a", Severity::Error, "m", "c.ts", 1),
        ];
        let payload = diff(&current, &baseline);
        assert_eq!(payload.summary.added, 1);
        assert_eq!(payload.summary.resolved, 1);
        assert_eq!(payload.added[0].file_path, "c.ts");
        assert_eq!(payload.resolved[0].file_path, "b.ts");
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn load_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        fs::write(&path, "not json").unwrap();
        assert!(load(&path).is_err());
    }
}
