use anyhow::Result;
use predicates::prelude::*;

use crate::CliTest;

const MANIFEST_YAML: &str = r#"manifest_version: "1.0"
name: demo
services:
  user-service:
    language: go
    role: producer
contracts:
  - id: user-api
    producer: user-service
    consumers: []
    protocol: http
    endpoints:
      - path: /users
        method: POST
        status_codes: [201]
"#;

fn stricture_yml(handler_glob: &str) -> String {
    format!(
        "version: \"1.0\"\nmanifest:\n  path: ./manifest.yml\n  service: user-service\n  contracts:\n    - id: user-api\n      role: producer\n      handler_paths: [\"{handler_glob}\"]\n"
    )
}

/// S4: a contract endpoint with no matching handler under the bound service's
/// `handler_paths` is flagged by `CTR-manifest-conformance`.
#[test]
fn undeclared_endpoint_flags_conformance_violation() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("manifest.yml", MANIFEST_YAML)?;
    test.write_file(".stricture.yml", &stricture_yml("**/*.go"))?;
    test.write_file("handler.go", "// handler.go — unrelated routes\npackage main\n\nfunc ping() {}\n")?;

    test.analyze_command()
        .arg("--rule")
        .arg("CTR-manifest-conformance")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CTR-manifest-conformance"))
        .stdout(predicate::str::contains("/users"));

    Ok(())
}

/// A handler matching the declared endpoint's method and path satisfies
/// conformance, producing no `CTR-manifest-conformance` finding.
#[test]
fn matching_handler_satisfies_conformance() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("manifest.yml", MANIFEST_YAML)?;
    test.write_file(".stricture.yml", &stricture_yml("**/*.go"))?;
    test.write_file(
        "handler.go",
        "// handler.go — user routes\npackage main\n\nfunc register(r *Router) {\n\tr.HandleFunc(\"/users\", createUser).Methods(\"POST\")\n}\n",
    )?;

    test.analyze_command()
        .arg("--rule")
        .arg("CTR-manifest-conformance")
        .assert()
        .code(0);

    Ok(())
}

/// S5: `strictness.minimum: strict` flags a field whose declared
/// constraints only reach `standard` as a manifest-level finding.
#[test]
fn strictness_minimum_flags_an_under_constrained_field() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "manifest.yml",
        r#"manifest_version: "1.0"
name: demo
services:
  user-service:
    language: go
    role: producer
strictness:
  minimum: strict
contracts:
  - id: user-api
    producer: user-service
    consumers: []
    protocol: http
    endpoints:
      - path: /users
        method: POST
        status_codes: [201]
        request:
          - name: email
            type: string
            required: true
            format: email
"#,
    )?;
    test.write_file(".stricture.yml", &stricture_yml("**/*.go"))?;
    test.write_file(
        "handler.go",
        "// handler.go — user routes\npackage main\n\nfunc register(r *Router) {\n\tr.HandleFunc(\"/users\", createUser).Methods(\"POST\")\n}\n",
    )?;

    test.analyze_command()
        .arg("--format")
        .arg("json")
        .output()
        .map(|output| {
            let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
            let violations = report["violations"].as_array().unwrap();
            assert!(violations.iter().any(|v| {
                v["ruleId"] == serde_json::json!("manifest-strictness")
                    && v["message"].as_str().unwrap().contains("'standard' but minimum is 'strict'")
            }));
        })?;

    Ok(())
}

/// `--manifest` without a configured `manifest.service` is a usage error.
#[test]
fn manifest_flag_without_config_is_a_usage_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("manifest.yml", MANIFEST_YAML)?;

    test.analyze_command()
        .arg("--manifest")
        .arg("manifest.yml")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("manifest.service"));

    Ok(())
}
