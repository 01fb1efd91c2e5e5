//! Severity floor and `--max-violations` truncation (C7, §4.7).

use crate::error::StrictureError;
use crate::model::{Severity, Violation};

/// `--severity warn|error` / `--quiet` floor: keep violations at-or-above.
pub fn apply_severity_floor(violations: Vec<Violation>, floor: Severity) -> Vec<Violation> {
    violations.into_iter().filter(|v| v.severity >= floor).collect()
}

/// Truncate to the first `max` violations in final order, applied *after*
/// baseline/diff filtering (§4.7). A negative `max` is a configuration error.
pub fn apply_max_violations(mut violations: Vec<Violation>, max: Option<i64>) -> Result<Vec<Violation>, StrictureError> {
    let Some(max) = max else {
        return Ok(violations);
    };
    if max < 0 {
        return Err(StrictureError::Config {
            detail: format!("--max-violations must be >= 0, got {max}"),
        });
    }
    violations.truncate(max as usize);
    Ok(violations)
}
