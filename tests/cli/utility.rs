use anyhow::Result;
use predicates::prelude::*;

use crate::CliTest;

#[test]
fn list_rules_prints_every_builtin_rule_id() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .arg("list-rules")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CONV-file-header"))
        .stdout(predicate::str::contains("CONV-export-naming"));

    Ok(())
}

#[test]
fn explain_prints_the_named_rules_detail_block() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .arg("explain")
        .arg("CONV-file-naming")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CONV-file-naming"))
        .stdout(predicate::str::contains("Rationale:"));

    Ok(())
}

#[test]
fn explain_rejects_an_unknown_rule_id() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .arg("explain")
        .arg("NOPE-not-a-rule")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no such rule"));

    Ok(())
}

#[test]
fn init_writes_a_default_config_and_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").assert().code(0);
    let written = test.read_file(".stricture.yml")?;
    assert!(written.contains("rules: {}"));

    test.command()
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    test.command().arg("init").arg("--force").assert().code(0);

    Ok(())
}

#[test]
fn validate_config_reports_rule_and_plugin_counts() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".stricture.yml",
        "version: \"1.0\"\nrules:\n  CONV-file-header: off\nplugins: []\n",
    )?;

    test.command()
        .arg("validate-config")
        .arg(".stricture.yml")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("1 rule override(s)"));

    Ok(())
}

#[test]
fn validate_config_rejects_a_malformed_document() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".stricture.yml", "rules:\n  CONV-file-header: not-a-real-severity\n")?;

    test.command()
        .arg("validate-config")
        .arg(".stricture.yml")
        .assert()
        .code(2);

    Ok(())
}

#[test]
fn inspect_prints_the_file_model_as_json() -> Result<()> {
    let test = CliTest::with_file("a.ts", "export function greet() {}\n")?;

    let output = test.command().arg("inspect").arg("a.ts").output()?;
    assert_eq!(output.status.code(), Some(0));

    let model: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(model["language"], serde_json::json!("typescript"));
    assert_eq!(model["exports"][0]["name"], serde_json::json!("greet"));
    assert_eq!(model["isTestFile"], serde_json::json!(false));

    Ok(())
}
