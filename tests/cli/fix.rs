use anyhow::Result;
use predicates::prelude::*;

use crate::CliTest;

/// `--fix` rewrites the offending token in place; the run still reports the
/// violation it just fixed (the report reflects what was found, not what
/// remains on disk after the edit).
#[test]
fn fix_rewrites_the_offending_export_name() -> Result<()> {
    let test = CliTest::with_file(
        "a.ts",
        "// a.ts — greeting helper\nexport function DoThing() {}\n",
    )?;

    test.analyze_command()
        .arg("--rule")
        .arg("CONV-export-naming")
        .arg("--fix")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("applied 1 fix"));

    let rewritten = test.read_file("a.ts")?;
    assert!(rewritten.contains("doThing"));
    assert!(!rewritten.contains("DoThing"));

    Ok(())
}

/// `--fix-dry-run` prints the planned edit without touching the file.
#[test]
fn fix_dry_run_leaves_the_file_untouched() -> Result<()> {
    let test = CliTest::with_file(
        "a.ts",
        "// a.ts — greeting helper\nexport function DoThing() {}\n",
    )?;

    test.analyze_command()
        .arg("--rule")
        .arg("CONV-export-naming")
        .arg("--fix-dry-run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("'DoThing' -> 'doThing'"));

    let unchanged = test.read_file("a.ts")?;
    assert!(unchanged.contains("DoThing"));

    Ok(())
}

/// `--fix-backup` without `--fix` is a usage error.
#[test]
fn fix_backup_requires_fix() -> Result<()> {
    let test = CliTest::with_file(
        "a.ts",
        "// a.ts — greeting helper\nexport function DoThing() {}\n",
    )?;

    test.analyze_command()
        .arg("--fix-backup")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--fix-backup requires --fix"));

    Ok(())
}

/// `--fix --fix-backup` writes a `.bak` copy of the original content.
#[test]
fn fix_backup_writes_a_bak_copy() -> Result<()> {
    let test = CliTest::with_file(
        "a.ts",
        "// a.ts — greeting helper\nexport function DoThing() {}\n",
    )?;

    test.analyze_command()
        .arg("--rule")
        .arg("CONV-export-naming")
        .arg("--fix")
        .arg("--fix-backup")
        .assert()
        .code(1);

    let backup = test.read_file("a.ts.bak")?;
    assert!(backup.contains("DoThing"));

    Ok(())
}
