//! # Change Classification
//!
//! The vocabulary shared by file-level and row-level comparisons. Every
//! expected artifact (a file under a leader, a reference table, a single
//! table row) ends up with exactly one [`ChangeType`].
//!
//! The base [`classify`] function only ever yields `Missing`, `Outdated` or
//! `UpToDate`. `Conflicting` and `Extra` are assigned by callers that have
//! more context: the merge engine marks user-edited rows as conflicting and
//! user-only rows as extra, and the gap analyzer marks undeclared specialist
//! files as extra.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

/// Outcome of comparing one desired artifact with the installed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Expected but absent
    Missing,
    /// Present but different from what would be generated
    Outdated,
    /// Present and current
    UpToDate,
    /// Present, differs, and the difference looks like a user edit
    Conflicting,
    /// Present with no corresponding desired entry
    Extra,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Outdated => "outdated",
            Self::UpToDate => "up_to_date",
            Self::Conflicting => "conflicting",
            Self::Extra => "extra",
        }
    }

    /// True for the outcomes that mean re-provisioning has work to do
    pub fn needs_action(&self) -> bool {
        matches!(self, Self::Missing | Self::Outdated)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a single artifact.
///
/// `content_matches` is only invoked when the artifact is present; it
/// returns `None` when no content comparison is wanted (existence-only) and
/// `Some(equal)` otherwise.
pub fn classify<F>(expected: bool, present: bool, content_matches: F) -> ChangeType
where
    F: FnOnce() -> Option<bool>,
{
    if !present {
        return if expected {
            ChangeType::Missing
        } else {
            ChangeType::UpToDate
        };
    }

    match content_matches() {
        None | Some(true) => ChangeType::UpToDate,
        Some(false) => ChangeType::Outdated,
    }
}

/// Classified status of one artifact: a path for files, a key for rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
    pub identity: String,
    pub change_type: ChangeType,
    pub details: String,
}

impl ArtifactStatus {
    pub fn new(
        identity: impl Into<String>,
        change_type: ChangeType,
        details: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            change_type,
            details: details.into(),
        }
    }

    pub fn for_path(path: &Path, change_type: ChangeType, details: impl Into<String>) -> Self {
        Self::new(path.display().to_string(), change_type, details)
    }

    /// Last path component of the identity, or the identity itself
    pub fn file_name(&self) -> &str {
        Path::new(&self.identity)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.identity)
    }
}

/// Check one expected file.
///
/// With `expected_content` the file is compared byte-for-byte after reading
/// it as UTF-8; an unreadable file counts as differing.
pub fn check_file_status(path: &Path, expected_content: Option<&str>) -> ArtifactStatus {
    let change_type = classify(true, path.exists(), || {
        expected_content.map(|expected| {
            fs::read_to_string(path)
                .map(|actual| actual == expected)
                .unwrap_or(false)
        })
    });

    let details = match (change_type, expected_content) {
        (ChangeType::Missing, _) => "File does not exist",
        (ChangeType::UpToDate, None) => "File exists",
        (ChangeType::UpToDate, Some(_)) => "Content matches",
        _ => "Content differs",
    };

    ArtifactStatus::for_path(path, change_type, details)
}

/// Status of one declared leader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderStatus {
    pub name: String,
    pub installed: bool,
    pub artifacts: Vec<ArtifactStatus>,
}

impl LeaderStatus {
    /// A leader whose root is absent: one `Missing` entry, nothing below it.
    pub fn not_installed(name: impl Into<String>, root: &Path) -> Self {
        Self {
            name: name.into(),
            installed: false,
            artifacts: vec![ArtifactStatus::for_path(
                root,
                ChangeType::Missing,
                "Leader not installed",
            )],
        }
    }

    /// Any artifact is missing or outdated
    pub fn needs_update(&self) -> bool {
        self.artifacts.iter().any(|a| a.change_type.needs_action())
    }

    /// Every artifact is up to date
    pub fn is_up_to_date(&self) -> bool {
        self.artifacts
            .iter()
            .all(|a| a.change_type == ChangeType::UpToDate)
    }

    /// Artifacts that are not up to date
    pub fn pending(&self) -> impl Iterator<Item = &ArtifactStatus> {
        self.artifacts
            .iter()
            .filter(|a| a.change_type != ChangeType::UpToDate)
    }
}
