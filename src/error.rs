//! The CLI-boundary error taxonomy (§7). Library functions mostly return
//! `anyhow::Result`; `StrictureError` exists only where the CLI needs to
//! pick an exit code without string-matching an opaque `anyhow::Error`
//! (a bare `anyhow::Error` carries no exit-code information of its own).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrictureError {
    #[error("{path}: {detail}")]
    Parse { path: String, detail: String },

    #[error("{detail}")]
    Config { detail: String },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rule '{rule_id}' failed: {detail}")]
    RuleInternal { rule_id: String, detail: String },
}

impl StrictureError {
    /// All `StrictureError` variants map to exit code 2 (§7); this is a
    /// thin readability wrapper over that constant fact.
    pub const EXIT_CODE: i32 = 2;
}
