//! Installed-state layout
//!
//! Where the gap analyzer and the provisioner look for things under a
//! project root:
//!
//! ```text
//! <project>/
//!   package.json                      # may pin bmad-method
//!   _bmad/
//!     core/VERSION                    # fallback version marker
//!     custom-skills/
//!       <leader>/
//!         agents/leader-<short>.md
//!         agents/specialist-<id>.md
//!         workflows/route-to-specialist.yaml
//!         references/routing-rules.md
//!         data/*.csv                  # reference tables
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const FRAMEWORK_DIR: &str = "_bmad";
pub const CUSTOM_SKILLS_DIR: &str = "custom-skills";
pub const PACKAGE_JSON: &str = "package.json";
/// npm package name of the framework
pub const FRAMEWORK_PACKAGE: &str = "bmad-method";

const SPECIALIST_PREFIX: &str = "specialist-";

/// Paths of an installation rooted at a project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledLayout {
    project_root: PathBuf,
}

impl InstalledLayout {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn framework_root(&self) -> PathBuf {
        self.project_root.join(FRAMEWORK_DIR)
    }

    pub fn skills_root(&self) -> PathBuf {
        self.framework_root().join(CUSTOM_SKILLS_DIR)
    }

    pub fn package_json(&self) -> PathBuf {
        self.project_root.join(PACKAGE_JSON)
    }

    pub fn version_marker(&self) -> PathBuf {
        self.framework_root().join("core").join("VERSION")
    }

    pub fn leader(&self, name: &str) -> LeaderLayout {
        LeaderLayout {
            root: self.skills_root().join(name),
            short_name: name.replace("-leader", ""),
        }
    }
}

/// Fixed sub-layout of one installed leader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderLayout {
    root: PathBuf,
    short_name: String,
}

impl LeaderLayout {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.root.join("agents")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Primary leader definition
    pub fn agent_file(&self) -> PathBuf {
        self.agents_dir()
            .join(format!("leader-{}.md", self.short_name))
    }

    pub fn workflow_file(&self) -> PathBuf {
        self.root.join("workflows").join("route-to-specialist.yaml")
    }

    pub fn routing_rules(&self) -> PathBuf {
        self.root.join("references").join("routing-rules.md")
    }

    pub fn specialist_file(&self, id: &str) -> PathBuf {
        self.agents_dir()
            .join(format!("{}{}.md", SPECIALIST_PREFIX, id))
    }

    /// Location of a reference table.
    ///
    /// Table names must be plain file names; anything that would escape the
    /// `data/` directory is rejected.
    pub fn table(&self, file_name: &str) -> Result<PathBuf> {
        let candidate = Path::new(file_name);
        let is_plain = candidate.components().count() == 1
            && candidate.file_name().map(|n| n == candidate.as_os_str()).unwrap_or(false);
        if !is_plain {
            return Err(Error::Layout {
                message: format!("Table name must be a plain file name: {}", file_name),
            });
        }
        Ok(self.data_dir().join(file_name))
    }

    /// Installed specialist files matching `agents/specialist-*.md`, as
    /// `(id, path)` pairs sorted by id.
    pub fn installed_specialists(&self) -> Vec<(String, PathBuf)> {
        let pattern = format!(
            "{}/{}*.md",
            glob::Pattern::escape(&self.agents_dir().to_string_lossy()),
            SPECIALIST_PREFIX
        );

        let mut found: Vec<(String, PathBuf)> = match glob::glob(&pattern) {
            Ok(paths) => paths
                .filter_map(|entry| entry.ok())
                .filter_map(|path| {
                    let stem = path.file_stem()?.to_str()?;
                    let id = stem.strip_prefix(SPECIALIST_PREFIX)?.to_string();
                    Some((id, path))
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        found.sort();
        found
    }

    /// Installed reference tables (`data/*.csv`), sorted by path
    pub fn installed_tables(&self) -> Vec<PathBuf> {
        let pattern = format!(
            "{}/*.csv",
            glob::Pattern::escape(&self.data_dir().to_string_lossy())
        );
        let mut found: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
            Err(_) => Vec::new(),
        };
        found.sort();
        found
    }
}
