use anyhow::Result;

use crate::CliTest;

/// S3: bootstrapping a baseline against two header-less files exits 0 and
/// records two fingerprints; adding a third violation afterwards reports
/// exactly that one new violation.
#[test]
fn bootstrap_then_new_violation_reports_only_the_addition() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.ts", "export const a = 1;\n")?;
    test.write_file("b.ts", "export const b = 2;\n")?;

    test.analyze_command()
        .arg("--rule")
        .arg("CONV-file-header")
        .arg("--baseline")
        .arg(".stricture-baseline.json")
        .assert()
        .code(0);

    let baseline_contents = test.read_file(".stricture-baseline.json")?;
    let parsed: serde_json::Value = serde_json::from_str(&baseline_contents)?;
    assert_eq!(parsed["fingerprints"].as_array().unwrap().len(), 2);

    test.write_file("c.ts", "export const c = 3;\n")?;

    let output = test
        .analyze_command()
        .arg("--rule")
        .arg("CONV-file-header")
        .arg("--baseline")
        .arg(".stricture-baseline.json")
        .arg("--format")
        .arg("json")
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let violations = report["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["filePath"], serde_json::json!("c.ts"));

    Ok(())
}

#[test]
fn diff_mode_reports_added_and_resolved_without_filtering() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.ts", "export const a = 1;\n")?;
    test.write_file("b.ts", "export const b = 2;\n")?;

    test.analyze_command()
        .arg("--rule")
        .arg("CONV-file-header")
        .arg("--baseline")
        .arg(".stricture-baseline.json")
        .assert()
        .code(0);

    std::fs::remove_file(test.root().join("b.ts"))?;
    test.write_file("c.ts", "export const c = 3;\n")?;

    let output = test
        .analyze_command()
        .arg("--rule")
        .arg("CONV-file-header")
        .arg("--baseline")
        .arg(".stricture-baseline.json")
        .arg("--diff")
        .arg("--format")
        .arg("json")
        .output()?;

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["diff"]["summary"]["added"], serde_json::json!(1));
    assert_eq!(report["diff"]["summary"]["resolved"], serde_json::json!(1));

    Ok(())
}
