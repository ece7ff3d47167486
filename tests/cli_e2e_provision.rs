//! End-to-end tests for the `provision` and `completions` commands.

mod common;
use common::prelude::*;
use std::fs;

#[test]
fn test_provision_creates_reference_tables() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA);

    fixture
        .command()
        .args(["provision", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Leaders to provision: 1"))
        .stdout(predicate::str::contains("qa-leader (qa): 2 specialists"))
        .stdout(predicate::str::contains(
            "[OK] qa-leader/test-types.csv: 6 new, 0 updated, 0 preserved, 0 custom",
        ))
        .stdout(predicate::str::contains(
            "Total: 3 tables reconciled, 0 failed, 0 leaders skipped",
        ));

    let routing = fs::read_to_string(fixture.table_path("qa-leader", "routing-keywords.csv")).unwrap();
    assert!(routing.starts_with("specialist,keywords\ne2e,"));
    assert!(fixture.table_path("qa-leader", "qa-checklist.csv").exists());
}

#[test]
fn test_reprovision_preserves_user_data() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA)
        .with_file(
            "_bmad/custom-skills/qa-leader/data/test-types.csv",
            "test_type,priority,automation_level\n\
             unit,LOW,MANUAL\n\
             fuzz,HIGH,AUTOMATED\n\
             e2e, high ,automated\n",
        );

    fixture
        .command()
        .args(["provision", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "qa-leader/test-types.csv: 4 new, 1 updated, 1 preserved, 1 custom",
        ));

    let content = fs::read_to_string(fixture.table_path("qa-leader", "test-types.csv")).unwrap();
    assert_eq!(
        content,
        "test_type,priority,automation_level\n\
         fuzz,HIGH,AUTOMATED\n\
         e2e,HIGH,AUTOMATED\n\
         unit,LOW,MANUAL\n\
         accessibility,HIGH,AUTOMATED\n\
         integration,HIGH,AUTOMATED\n\
         performance,HIGH,AUTOMATED\n\
         security,HIGH,AUTOMATED\n"
    );
}

#[test]
fn test_provision_dry_run_writes_nothing() {
    let fixture = TestFixture::new()
        .with_unversioned_framework()
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA);

    fixture
        .command()
        .args(["provision", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete - no changes made"));

    assert!(!fixture.table_path("qa-leader", "test-types.csv").exists());
}

#[test]
fn test_provision_skips_uninstalled_leaders() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("healthcare-leader", &["clinical"])
        .with_manifest(manifests::MIXED);

    fixture
        .command()
        .args(["provision", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ops-leader: not installed, skipped"))
        .stdout(predicate::str::contains(
            "Total: 3 tables reconciled, 0 failed, 1 leaders skipped",
        ));

    assert!(fixture
        .table_path("healthcare-leader", "hipaa-checklist.csv")
        .exists());
}

#[test]
fn test_provision_rejects_incompatible_version() {
    let fixture = TestFixture::new()
        .with_file("_bmad/core/VERSION", "5.2.0\n")
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA);

    fixture
        .command()
        .args(["provision", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not satisfy"));

    assert!(!fixture.table_path("qa-leader", "test-types.csv").exists());
}

#[test]
fn test_provision_reports_unwritable_table() {
    let fixture = TestFixture::new()
        .with_framework()
        .with_leader("qa-leader", &["unit", "e2e"])
        .with_manifest(manifests::QA);
    fs::create_dir_all(fixture.table_path("qa-leader", "qa-checklist.csv")).unwrap();

    fixture
        .command()
        .args(["provision", "--yes"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[ERR] qa-leader/qa-checklist.csv"))
        .stderr(predicate::str::contains("1 reference tables failed to provision"));

    assert!(fixture.table_path("qa-leader", "test-types.csv").exists());
}

#[test]
fn test_completions_bash() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bmad-provisioner"))
        .stdout(predicate::str::contains("provision"));
}

#[test]
fn test_completions_other_shells() {
    let fixture = TestFixture::new();

    for shell in ["zsh", "fish", "powershell", "elvish"] {
        fixture
            .command()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("bmad-provisioner"));
    }

    fixture
        .command()
        .args(["completions", "tcsh"])
        .assert()
        .failure();
}
