//! Git subprocess helpers for `--changed`/`--staged` scope selection (C6, §4.6).
//!
//! Read-only, via `std::process::Command` — there is no `git2`/libgit2
//! binding in the dependency stack, matching the resource note in §5.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Files differing from `HEAD` in the working tree (includes unstaged and
/// staged changes, not untracked files).
pub fn changed_files(root: &std::path::Path) -> Result<Vec<PathBuf>> {
    run_git(root, &["diff", "--name-only", "HEAD"])
}

/// Files currently staged in the index.
pub fn staged_files(root: &std::path::Path) -> Result<Vec<PathBuf>> {
    run_git(root, &["diff", "--name-only", "--cached"])
}

fn run_git(root: &std::path::Path, args: &[&str]) -> Result<Vec<PathBuf>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .context("failed to invoke git (is it installed and on PATH?)")?;

    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| root.join(l))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_git_on_non_repo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = changed_files(dir.path());
        assert!(result.is_err());
    }
}
