use anyhow::Result;
use predicates::prelude::*;

use crate::CliTest;

/// S1: a header-less Go file is the sole violation, with the exact suggested fix.
#[test]
fn missing_header_flags_one_violation_and_exits_failure() -> Result<()> {
    let test = CliTest::with_file("bad.go", "package main\n\nfunc main() {}\n")?;

    test.analyze_command()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CONV-file-header"))
        .stdout(predicate::str::contains("bad.go:1"))
        .stdout(predicate::str::contains("// bad.go — "));

    Ok(())
}

/// S2: `--rule CONV-file-naming` on a PascalCase TypeScript file reports the
/// expected message and kebab-case suggestion, and nothing else runs.
#[test]
fn rule_filter_restricts_to_one_rule() -> Result<()> {
    let test = CliTest::with_file("UserService.ts", "export function f() {}\n")?;

    test.analyze_command()
        .arg("--rule")
        .arg("CONV-file-naming")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("kebab-case"))
        .stdout(predicate::str::contains("user-service.ts"))
        .stdout(predicate::str::contains("CONV-file-naming").count(1));

    Ok(())
}

#[test]
fn clean_project_exits_success() -> Result<()> {
    let test = CliTest::with_file(
        "greet.go",
        "// greet.go — prints a friendly greeting\npackage greet\n\nfunc Hello() string {\n\treturn \"hi\"\n}\n",
    )?;

    test.analyze_command().assert().code(0);

    Ok(())
}

#[test]
fn json_format_round_trips_into_a_run_report() -> Result<()> {
    let test = CliTest::with_file("bad.go", "package main\n\nfunc main() {}\n")?;

    let output = test.analyze_command().arg("--format").arg("json").output()?;
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["summary"]["totalViolations"], serde_json::json!(1));
    assert_eq!(report["violations"][0]["ruleId"], serde_json::json!("CONV-file-header"));

    Ok(())
}

#[test]
fn quiet_and_explicit_severity_conflict_exits_error() -> Result<()> {
    let test = CliTest::with_file("bad.go", "package main\n\nfunc main() {}\n")?;

    test.analyze_command().arg("--quiet").arg("--severity").arg("warn").assert().code(2);

    Ok(())
}

#[test]
fn changed_and_staged_conflict_exits_error() -> Result<()> {
    let test = CliTest::with_file("bad.go", "package main\n\nfunc main() {}\n")?;

    test.analyze_command().arg("--changed").arg("--staged").assert().code(2);

    Ok(())
}

/// S6: an invalid (multi-word) error operation token fails by default, and
/// passes once the message uses an acceptable PascalCase operation.
#[test]
fn error_format_rejects_multi_word_operation_by_default() -> Result<()> {
    let test = CliTest::with_file(
        "main.go",
        "package main\n\nfunc doWork() error {\n\treturn fmt.Errorf(\"bad request: %v\", err)\n}\n",
    )?;

    test.analyze_command()
        .arg("--rule")
        .arg("CONV-error-format")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("BadRequest: %v"));

    Ok(())
}

#[test]
fn error_format_accepts_pascal_case_operation() -> Result<()> {
    let test = CliTest::with_file(
        "main.go",
        "package main\n\nfunc createUser() error {\n\treturn errors.New(\"CreateUser: email already exists\")\n}\n",
    )?;

    test.analyze_command().arg("--rule").arg("CONV-error-format").assert().code(0);

    Ok(())
}
