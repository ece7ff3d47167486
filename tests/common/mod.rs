//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_framework().with_manifest(manifests::QA);
//!     fixture.command().arg("validate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets. `{root}` is replaced with the fixture directory.
#[allow(dead_code)]
pub mod manifests {
    /// One QA leader with two specialists.
    pub const QA: &str = r#"
project:
  name: demo-app
  bmad_version: ">=6.0.0-alpha"
  root: "{root}"
  leaders:
    - name: qa-leader
      domain: qa
      phase: 4-impl
      specialists:
        - id: unit
          name: Unit Tester
          domain: unit
          skills: [mocking]
        - id: e2e
          name: E2E Tester
          domain: e2e
          skills: [playwright]
"#;

    /// A healthcare leader and a generic leader.
    pub const MIXED: &str = r#"
project:
  name: clinic-portal
  bmad_version: ">=6.0.0-alpha"
  root: "{root}"
  leaders:
    - name: healthcare-leader
      domain: healthcare
      specialists:
        - id: clinical
          name: Clinical Specialist
          domain: clinical
          skills: [diagnosis-review]
    - name: ops-leader
      domain: generic
      specialists:
        - id: deploy
          name: Deploy Specialist
          domain: deploy
          skills: [kubernetes]
"#;

    /// Same leader declared twice.
    pub const DUPLICATE_LEADERS: &str = r#"
project:
  name: broken
  bmad_version: ">=6.0.0"
  root: "{root}"
  leaders:
    - name: qa-leader
      domain: qa
      specialists: []
    - name: qa-leader
      domain: qa
      specialists: []
"#;

    /// Not a manifest at all.
    pub const INVALID_YAML: &str = "project: [unclosed";
}

/// A temporary project directory with an optional manifest and installation.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `skills-manifest.yaml`, pointing its root at the fixture.
    pub fn with_manifest(self, template: &str) -> Self {
        let content = template.replace("{root}", &self.path().display().to_string());
        self.with_file("skills-manifest.yaml", &content)
    }

    /// Create the framework directory and a version marker.
    pub fn with_framework(self) -> Self {
        self.with_file("_bmad/core/VERSION", "6.0.0-alpha.3\n")
    }

    /// Create the framework directory without any version information.
    pub fn with_unversioned_framework(self) -> Self {
        self.temp_dir
            .child("_bmad/custom-skills")
            .create_dir_all()
            .expect("Failed to create framework dir");
        self
    }

    /// Install the fixed files of a leader and its specialists.
    pub fn with_leader(self, name: &str, specialists: &[&str]) -> Self {
        let short = name.replace("-leader", "");
        let base = format!("_bmad/custom-skills/{name}");
        let mut fixture = self
            .with_file(&format!("{base}/agents/leader-{short}.md"), "# leader\n")
            .with_file(&format!("{base}/workflows/route-to-specialist.yaml"), "sequence: []\n")
            .with_file(&format!("{base}/references/routing-rules.md"), "# rules\n");
        for id in specialists {
            fixture = fixture.with_file(&format!("{base}/agents/specialist-{id}.md"), "# specialist\n");
        }
        fixture
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("skills-manifest.yaml")
    }

    /// Path of a leader's reference table.
    pub fn table_path(&self, leader: &str, file: &str) -> PathBuf {
        self.path()
            .join("_bmad/custom-skills")
            .join(leader)
            .join("data")
            .join(file)
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory, with plain output.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bmad-provisioner");
        cmd.current_dir(self.path())
            .env_remove("BMAD_PROVISIONER_CONFIG")
            .env_remove("BMAD_PROVISIONER_ROOT")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
