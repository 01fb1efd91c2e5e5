use std::process::ExitCode;

/// Exit status for the `stricture` binary (§7).
///
/// - `Success` (0): no violations at or above the effective severity floor
/// - `Failure` (1): violations were found and reported
/// - `Error` (2): an operational failure — malformed manifest/config/baseline,
///   an unreadable required input, or a flag-conflict the CLI rejects outright
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
