//! End-to-end tests for the `analyze` and `diff` commands.

mod common;
use common::prelude::*;

#[test]
fn test_analyze_uninstalled_leader() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_manifest(manifests::QA);

    fixture
        .command()
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzing project: demo-app"))
        .stdout(predicate::str::contains("BMAD Version: 6.0.0-alpha.3"))
        .stdout(predicate::str::contains("[MISSING] qa-leader: Not installed"))
        .stdout(predicate::str::contains("Install 1 missing leaders: qa-leader"));
}

#[test]
fn test_analyze_after_provision_is_up_to_date() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA);

    fixture.command().args(["provision", "--yes"]).assert().success();

    fixture
        .command()
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] qa-leader: Up to date"))
        .stdout(predicate::str::contains("All leaders up to date - safe to provision"));
}

#[test]
fn test_analyze_json() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("qa-leader", &["unit"])
        .with_manifest(manifests::QA);

    let output = fixture
        .command()
        .args(["analyze", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["bmad_version"], "6.0.0-alpha.3");
    assert_eq!(report["version_compatible"], true);
    assert_eq!(report["leaders"][0]["installed"], true);
    let missing: Vec<_> = report["leaders"][0]["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["change_type"] == "missing")
        .map(|a| a["identity"].as_str().unwrap().to_string())
        .collect();
    // e2e specialist and the three reference tables
    assert_eq!(missing.len(), 4);
    assert!(missing.iter().any(|p| p.ends_with("specialist-e2e.md")));
}

#[test]
fn test_analyze_unknown_leader_suggests_name() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_manifest(manifests::QA);

    fixture
        .command()
        .args(["analyze", "--leader", "qa-leadr"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown leader: qa-leadr"))
        .stderr(predicate::str::contains("Did you mean 'qa-leader'?"));
}

#[test]
fn test_analyze_refuses_invalid_manifest() {
    let fixture = TestFixture::new().with_manifest(manifests::QA);

    fixture
        .command()
        .arg("analyze")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BMAD not installed"));
}

#[test]
fn test_diff_lists_files_to_create() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_manifest(manifests::QA);

    fixture
        .command()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("+ CREATE: qa-leader"))
        .stdout(predicate::str::contains("   - agents/leader-qa.md"))
        .stdout(predicate::str::contains("   - agents/specialist-e2e.md"))
        .stdout(predicate::str::contains("   - data/qa-checklist.csv"));
}

#[test]
fn test_diff_lists_missing_tables_of_installed_leader() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA);

    fixture
        .command()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("~ UPDATE: qa-leader"))
        .stdout(predicate::str::contains(
            "   - test-types.csv: CSV missing (6 rows expected)",
        ))
        .stdout(predicate::str::contains("leader-qa.md").not());
}

#[test]
fn test_diff_no_changes() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA);

    fixture.command().args(["provision", "--yes"]).assert().success();

    fixture
        .command()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes"));
}
