//! # Skills Manifest
//!
//! Typed representation of the `skills-manifest.yaml` file that declares the
//! desired state: which leaders exist, which specialists each one routes to,
//! and the per-leader customizations.
//!
//! ```yaml
//! project:
//!   name: clinic-portal
//!   bmad_version: ">=6.0.0-alpha"
//!   root: ~/work/clinic-portal
//!   leaders:
//!     - name: healthcare-leader
//!       domain: healthcare
//!       specialists:
//!         - id: clinical
//!           name: Clinical Specialist
//!           domain: clinical
//!           skills: [diagnosis-review]
//! ```
//!
//! Parsing never validates cross-record constraints. [`Manifest::validate`]
//! collects every problem into a list so the caller can report them as one
//! batch and decide whether to stop.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::layout::InstalledLayout;

/// Leader names and specialist ids become file names
static SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("slug pattern is a valid regex")
});

/// Domain tag of a leader.
///
/// Tags are matched after trimming and lowercasing. Known domains ship
/// reference tables; any other tag is kept, normalized, as `Other`. An
/// `Other` domain has no built-in tables, but unlike `Generic` its installed
/// `data/*.csv` tables are still listed by the gap analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    Generic,
    Healthcare,
    Qa,
    Cis,
    Other(String),
}

impl Domain {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Generic => "generic",
            Self::Healthcare => "healthcare",
            Self::Qa => "qa",
            Self::Cis => "cis",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic)
    }
}

impl From<String> for Domain {
    fn from(tag: String) -> Self {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "generic" | "" => Self::Generic,
            "healthcare" => Self::Healthcare,
            "qa" => Self::Qa,
            "cis" => Self::Cis,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Domain {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.as_str().to_string()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specialist routed to by a leader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialist {
    /// Identifier, used in `agents/specialist-<id>.md`
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form sub-domain (e.g. "clinical", "unit")
    pub domain: String,
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_notes: Option<String>,
}

/// A leader skill and its specialists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub name: String,
    pub domain: Domain,
    pub specialists: Vec<Specialist>,
    /// Workflow phase the leader plugs into
    #[serde(default = "default_phase")]
    pub phase: String,
}

fn default_phase() -> String {
    defaults::DEFAULT_PHASE.to_string()
}

/// Extra menu entry for a customized agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub trigger: String,
    pub workflow: String,
    pub description: String,
}

/// Per-leader agent customization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    #[serde(default)]
    pub memories: Vec<String>,
    #[serde(default)]
    pub menu_additions: Vec<MenuItem>,
    #[serde(default)]
    pub principles: Vec<String>,
}

impl Customization {
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty() && self.menu_additions.is_empty() && self.principles.is_empty()
    }
}

/// A workflow sequence the leaders take part in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowIntegration {
    pub phase: String,
    pub name: String,
    pub sequence: Vec<String>,
}

/// The `integration:` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    #[serde(default)]
    pub workflows: Vec<WorkflowIntegration>,
}

/// Project section of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Version requirement for the installed framework
    pub bmad_version: String,
    /// Project root; a leading `~/` is expanded when the manifest is parsed
    pub root: PathBuf,
    pub leaders: Vec<Leader>,
    #[serde(default)]
    pub customizations: BTreeMap<String, Customization>,
    #[serde(default)]
    pub integration: Integration,
}

impl Project {
    pub fn integrations(&self) -> &[WorkflowIntegration] {
        &self.integration.workflows
    }

    pub fn customization_for(&self, leader: &str) -> Option<&Customization> {
        self.customizations.get(leader)
    }

    pub fn leader(&self, name: &str) -> Option<&Leader> {
        self.leaders.iter().find(|l| l.name == name)
    }
}

/// The complete skills manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub project: Project,
}

/// Parse a manifest from YAML text.
pub fn parse(yaml: &str) -> Result<Manifest> {
    let mut manifest: Manifest = serde_yaml::from_str(yaml).map_err(|e| {
        let message = e.to_string();
        let hint = if message.contains("missing field `project`") {
            Some("The manifest must start with a top-level 'project:' key".to_string())
        } else if message.contains("missing field") {
            Some("Check the manifest against the documented schema".to_string())
        } else {
            None
        };
        Error::ManifestParse { message, hint }
    })?;

    manifest.project.root = expand_home(&manifest.project.root);
    Ok(manifest)
}

/// Load and parse a manifest file.
pub fn from_file(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

impl Manifest {
    /// Validate the manifest against a project root.
    ///
    /// `project_root` overrides the manifest's own root. Every problem found
    /// is returned; an empty list means the manifest is valid.
    pub fn validate(&self, project_root: Option<&Path>) -> Vec<String> {
        let mut errors = Vec::new();
        let root = project_root.unwrap_or(self.project.root.as_path());

        if !root.exists() {
            errors.push(format!("Project root does not exist: {}", root.display()));
        }

        let layout = InstalledLayout::new(root);
        if !layout.framework_root().exists() {
            errors.push(format!("BMAD not installed at {}", root.display()));
        }

        let mut names = HashSet::new();
        if !self.project.leaders.iter().all(|l| names.insert(l.name.as_str())) {
            errors.push("Duplicate leader names found".to_string());
        }

        for leader in &self.project.leaders {
            let mut ids = HashSet::new();
            if !leader.specialists.iter().all(|s| ids.insert(s.id.as_str())) {
                errors.push(format!("Duplicate specialist IDs in {}", leader.name));
            }
        }

        for leader in &self.project.leaders {
            if !SLUG.is_match(&leader.name) {
                errors.push(format!(
                    "Leader name '{}' must be lowercase letters, digits, '-' or '_'",
                    leader.name
                ));
            }
            for specialist in &leader.specialists {
                if !SLUG.is_match(&specialist.id) {
                    errors.push(format!(
                        "Specialist ID '{}' in {} must be lowercase letters, digits, '-' or '_'",
                        specialist.id, leader.name
                    ));
                }
            }
        }

        errors
    }

    /// Validate and turn a non-empty error list into [`Error::Validation`].
    pub fn ensure_valid(&self, project_root: Option<&Path>) -> Result<()> {
        let errors = self.validate(project_root);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { errors })
        }
    }
}
