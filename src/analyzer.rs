//! # Gap Analysis
//!
//! Walks the declared leaders against what is installed under a project
//! root and classifies every expected artifact.
//!
//! ## Per-leader pass
//!
//! - A leader whose directory is absent yields a single `Missing` entry.
//!   Nothing below it is inspected.
//! - For an installed leader the fixed files (leader agent, routing
//!   workflow, routing rules, one agent per specialist) are checked for
//!   presence, and compared by content when the desired state carries the
//!   expected text.
//! - Generated reference tables go through the merge planner, so a table
//!   only reports `Outdated` when provisioning would actually change it, and
//!   `Conflicting` when provisioning would drop rows it cannot key.
//! - Installed tables with no generated counterpart are reported as present
//!   without a content check, and undeclared specialist agents as `Extra`.
//!
//! ## Version detection
//!
//! Best effort: `package.json` first, then `_bmad/core/VERSION`. Failure to
//! find a version is logged and reported, never fatal.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use semver::{Version, VersionReq};

use crate::error::Result;
use crate::generator::{ArtifactGenerator, GeneratedTable};
use crate::layout::{InstalledLayout, LeaderLayout, FRAMEWORK_PACKAGE};
use crate::manifest::{Leader, Manifest};
use crate::merge::plan_table_file;
use crate::report::GapAnalysisReport;
use crate::status::{check_file_status, ArtifactStatus, ChangeType, LeaderStatus};

/// Desired state of one leader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredLeader {
    pub leader: Leader,
    /// Known content of fixed files, keyed by path relative to the leader root
    pub expected_content: BTreeMap<PathBuf, String>,
    /// Reference tables the generator produced for this leader
    pub tables: Vec<GeneratedTable>,
}

impl DesiredLeader {
    pub fn new(leader: Leader) -> Self {
        Self {
            leader,
            expected_content: BTreeMap::new(),
            tables: Vec::new(),
        }
    }

    /// Attach the expected text of a fixed file
    pub fn with_expected_content(
        mut self,
        relative_path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Self {
        self.expected_content
            .insert(relative_path.into(), content.into());
        self
    }

    fn expected_for(&self, layout: &LeaderLayout, path: &Path) -> Option<&str> {
        let relative = path.strip_prefix(layout.root()).ok()?;
        self.expected_content.get(relative).map(String::as_str)
    }
}

/// Everything the analyzer compares the installation against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    /// Version requirement for the framework, e.g. `>=6.0.0-alpha`
    pub framework_requirement: Option<String>,
    pub leaders: Vec<DesiredLeader>,
}

impl DesiredState {
    /// Leaders from the manifest, without any generated tables
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            framework_requirement: Some(manifest.project.bmad_version.clone()),
            leaders: manifest
                .project
                .leaders
                .iter()
                .cloned()
                .map(DesiredLeader::new)
                .collect(),
        }
    }

    /// Leaders from the manifest with their generated reference tables
    pub fn generate(manifest: &Manifest, generator: &dyn ArtifactGenerator) -> Result<Self> {
        let mut state = Self::from_manifest(manifest);
        for desired in &mut state.leaders {
            desired.tables = generator.generate(&desired.leader)?.tables;
        }
        Ok(state)
    }
}

/// Compares desired state with an installation
#[derive(Debug, Clone)]
pub struct GapAnalyzer {
    layout: InstalledLayout,
}

impl GapAnalyzer {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: InstalledLayout::new(project_root),
        }
    }

    pub fn layout(&self) -> &InstalledLayout {
        &self.layout
    }

    /// Detect the installed framework version.
    pub fn detect_version(&self) -> Option<String> {
        let package_json = self.layout.package_json();
        if package_json.exists() {
            match read_package_dependency(&package_json) {
                Ok(Some(version)) => return Some(version),
                Ok(None) => debug!("{} does not pin {}", package_json.display(), FRAMEWORK_PACKAGE),
                Err(e) => warn!("Ignoring malformed {}: {}", package_json.display(), e),
            }
        }

        let marker = self.layout.version_marker();
        if let Ok(content) = fs::read_to_string(&marker) {
            let version = content.trim();
            if !version.is_empty() {
                return Some(version.to_string());
            }
        }

        warn!(
            "BMAD version not detected under {}",
            self.layout.project_root().display()
        );
        None
    }

    pub fn check_leader_installed(&self, name: &str) -> bool {
        self.layout.leader(name).root().exists()
    }

    /// Classify every expected artifact of one leader
    pub fn analyze_leader(&self, desired: &DesiredLeader) -> LeaderStatus {
        let leader = &desired.leader;
        let layout = self.layout.leader(&leader.name);

        if !self.check_leader_installed(&leader.name) {
            debug!("{} is not installed", leader.name);
            return LeaderStatus::not_installed(&leader.name, layout.root());
        }

        let mut fixed = vec![
            layout.agent_file(),
            layout.workflow_file(),
            layout.routing_rules(),
        ];
        fixed.extend(leader.specialists.iter().map(|s| layout.specialist_file(&s.id)));

        let mut artifacts: Vec<ArtifactStatus> = fixed
            .iter()
            .map(|path| check_file_status(path, desired.expected_for(&layout, path)))
            .collect();

        artifacts.extend(desired.tables.iter().map(|table| table_status(&layout, table)));

        if !leader.domain.is_generic() {
            let generated: HashSet<&str> = desired
                .tables
                .iter()
                .map(|t| t.file_name.as_str())
                .collect();
            for path in layout.installed_tables() {
                let known = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| generated.contains(n));
                if !known {
                    artifacts.push(ArtifactStatus::for_path(
                        &path,
                        ChangeType::UpToDate,
                        "CSV exists (content check skipped)",
                    ));
                }
            }
        }

        let declared: HashSet<&str> = leader.specialists.iter().map(|s| s.id.as_str()).collect();
        for (id, path) in layout.installed_specialists() {
            if !declared.contains(id.as_str()) {
                artifacts.push(ArtifactStatus::for_path(
                    &path,
                    ChangeType::Extra,
                    "Specialist not declared in manifest",
                ));
            }
        }

        LeaderStatus {
            name: leader.name.clone(),
            installed: true,
            artifacts,
        }
    }

    /// Run the full analysis
    pub fn analyze(&self, desired: &DesiredState) -> GapAnalysisReport {
        let framework_installed = self.layout.framework_root().exists();
        let bmad_version = if framework_installed {
            self.detect_version()
        } else {
            None
        };
        let version_compatible = match (&bmad_version, &desired.framework_requirement) {
            (Some(detected), Some(requirement)) => version_satisfies(detected, requirement),
            _ => None,
        };

        let leaders = desired
            .leaders
            .iter()
            .map(|leader| self.analyze_leader(leader))
            .collect();

        GapAnalysisReport::new(
            bmad_version,
            desired.framework_requirement.clone(),
            version_compatible,
            framework_installed,
            leaders,
        )
    }
}

/// Classify a generated table against its installed copy through the merge
/// planner. Unreadable tables are reported as conflicting.
fn table_status(layout: &LeaderLayout, table: &GeneratedTable) -> ArtifactStatus {
    let path = match layout.table(&table.file_name) {
        Ok(path) => path,
        Err(e) => {
            return ArtifactStatus::new(&table.file_name, ChangeType::Conflicting, e.to_string())
        }
    };

    match plan_table_file(&path, &table.rows, table.key_column) {
        Ok(plan) => {
            let result = &plan.result;
            let change_type = plan.change_type();
            let details = match change_type {
                ChangeType::Missing => format!("CSV missing ({} rows expected)", table.rows.len()),
                ChangeType::Conflicting => format!(
                    "{} rows have a blank or duplicate key and would be dropped",
                    result.dropped_rows
                ),
                ChangeType::Outdated => {
                    let corrected = result
                        .outcomes
                        .iter()
                        .filter(|o| o.change_type == ChangeType::Outdated)
                        .count();
                    let mut details =
                        format!("{} rows missing, {} rows outdated", result.new_rows, corrected);
                    if plan.header_changed() {
                        details.push_str(", header changed");
                    }
                    details
                }
                _ if result.kept_user_data() => format!(
                    "All {} rows present ({} custom, {} edited)",
                    table.rows.len(),
                    result.custom_rows,
                    result.preserved_rows
                ),
                _ => format!("All {} rows present", table.rows.len()),
            };
            debug!("{}: {} ({})", path.display(), change_type, details);
            ArtifactStatus::for_path(&path, change_type, details)
        }
        Err(e) => {
            warn!("{}", e);
            ArtifactStatus::for_path(&path, ChangeType::Conflicting, e.to_string())
        }
    }
}

/// Read `dependencies["bmad-method"]` from a package.json file
fn read_package_dependency(path: &Path) -> Result<Option<String>> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    Ok(value
        .get("dependencies")
        .and_then(|deps| deps.get(FRAMEWORK_PACKAGE))
        .and_then(|v| v.as_str())
        .map(str::to_string))
}

/// Whether a detected version satisfies a requirement.
///
/// `None` when either side does not parse. Range prefixes found in
/// `package.json` (`^`, `~`, `=`) and a leading `v` are ignored.
pub fn version_satisfies(detected: &str, requirement: &str) -> Option<bool> {
    let cleaned = detected.trim().trim_start_matches(['^', '~', '=', 'v']);
    let version = Version::parse(cleaned).ok()?;
    let requirement = VersionReq::parse(requirement.trim()).ok()?;
    Some(requirement.matches(&version))
}
