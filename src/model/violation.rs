//! `Violation` and `Severity` (§3). A violation is immutable once produced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resolved severity of a violation. `RuleConfig.severity` may additionally
/// carry `off` or "use the default", but neither ever reaches a `Violation`
/// (spec §3: "severity (resolved, not 'off')").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warn" | "warning" => Some(Severity::Warn),
            _ => None,
        }
    }
}

/// A suggested rewrite a fixable rule can produce (§4.3).
pub type SuggestedFix = String;

/// Optional extra context carried on a violation (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViolationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<SuggestedFix>,
}

/// One finding (§3 `Violation`). Immutable once constructed. JSON field names
/// follow the report wire shape in §6: `ruleId`, `filePath`, `startLine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub file_path: String,
    pub start_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ViolationContext>,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file_path: impl Into<String>,
        start_line: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            file_path: file_path.into(),
            start_line,
            context: None,
        }
    }

    pub fn with_suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.context = Some(ViolationContext {
            suggested_fix: Some(fix.into()),
        });
        self
    }

    /// The deterministic sort key used by C8 (§4.8): (ruleId, filePath,
    /// startLine, column(0 if absent), message). Stricture never tracks a
    /// column today, so that slot is always 0.
    pub fn sort_key(&self) -> (&str, &str, usize, usize, &str) {
        (&self.rule_id, &self.file_path, self.start_line, 0, &self.message)
    }

    /// The baseline fingerprint (§4.7/§3): (ruleId, project-relative
    /// filePath, startLine, normalized message).
    pub fn fingerprint(&self) -> (String, String, usize, String) {
        (
            self.rule_id.clone(),
            self.file_path.clone(),
            self.start_line,
            normalize_message(&self.message),
        )
    }
}

/// Collapse internal whitespace so cosmetic message differences (extra
/// spaces introduced by a reformat) don't defeat baseline matching.
fn normalize_message(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!(Severity::parse("Error"), Some(Severity::Error));
        assert_eq!(Severity::parse("WARN"), Some(Severity::Warn));
        assert_eq!(Severity::parse("warning"), Some(Severity::Warn));
        assert_eq!(Severity::parse("off"), None);
    }

    #[test]
    fn severity_orders_error_above_warn() {
        assert!(Severity::Error > Severity::Warn);
    }

    #[test]
    fn fingerprint_normalizes_whitespace() {
        let a = Violation::new("CONV-x", Severity::Error, "a   b", "f.ts", 1);
        let b = Violation::new("CONV-x", Severity::Error, "a b", "f.ts", 1);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn with_suggested_fix_sets_context() {
        let v = Violation::new("CONV-x", Severity::Error, "msg", "f.ts", 1)
            .with_suggested_fix("// f.ts — purpose");
        assert_eq!(
            v.context.unwrap().suggested_fix,
            Some("// f.ts — purpose".to_string())
        );
    }
}
