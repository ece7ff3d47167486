//! # CLI Command Implementations
//!
//! One file per subcommand of the `bmad-provisioner` tool. Each module has
//! an `Args` struct derived with `clap` and an `execute` function that calls
//! into the `bmad_provisioner` library and renders the result.
//!
//! [`ManifestArgs`] is flattened into every command that reads the skills
//! manifest, so `-c/--config` and `-p/--project-root` behave the same
//! everywhere.

pub mod analyze;
pub mod completions;
pub mod diff;
pub mod merge;
pub mod provision;
pub mod validate;

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use bmad_provisioner::analyzer::{DesiredState, GapAnalyzer};
use bmad_provisioner::defaults::{CONFIG_ENV, DEFAULT_MANIFEST, ROOT_ENV};
use bmad_provisioner::generator::CatalogGenerator;
use bmad_provisioner::manifest::{self, Manifest};
use bmad_provisioner::report::{derive_recommendations, GapAnalysisReport};
use bmad_provisioner::suggestions;

/// Manifest selection shared by the manifest-driven commands
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Path to the skills manifest
    #[arg(short, long, value_name = "FILE", env = CONFIG_ENV, default_value = DEFAULT_MANIFEST)]
    pub config: PathBuf,

    /// Project root; overrides `project.root` from the manifest
    #[arg(short = 'p', long, value_name = "DIR", env = ROOT_ENV)]
    pub project_root: Option<PathBuf>,
}

impl ManifestArgs {
    /// Parse the manifest and resolve the effective project root.
    pub fn load(&self) -> Result<(Manifest, PathBuf)> {
        if !self.config.exists() {
            return Err(suggestions::config_not_found(&self.config));
        }
        let manifest = manifest::from_file(&self.config)
            .with_context(|| format!("Failed to load {}", self.config.display()))?;
        let root = match &self.project_root {
            Some(root) => manifest::expand_home(root),
            None => manifest.project.root.clone(),
        };
        Ok((manifest, root))
    }

    /// Load and validate; validation problems abort as one batch.
    pub fn load_valid(&self) -> Result<(Manifest, PathBuf)> {
        let (manifest, root) = self.load()?;
        let errors = manifest.validate(Some(&root));
        if !errors.is_empty() {
            return Err(suggestions::validation_failed(&errors));
        }
        Ok((manifest, root))
    }
}

/// Desired state with generated tables, and the analysis of `root` against it
pub fn analyze_project(manifest: &Manifest, root: &Path) -> Result<(DesiredState, GapAnalysisReport)> {
    let desired = DesiredState::generate(manifest, &CatalogGenerator::default())?;
    let report = GapAnalyzer::new(root).analyze(&desired);
    Ok((desired, report))
}

/// Keep only the named leader, failing with a suggestion when it is unknown
pub fn filter_leader(manifest: &Manifest, report: &mut GapAnalysisReport, leader: Option<&str>) -> Result<()> {
    let Some(name) = leader else {
        return Ok(());
    };
    if manifest.project.leader(name).is_none() {
        let declared: Vec<&str> = manifest.project.leaders.iter().map(|l| l.name.as_str()).collect();
        return Err(suggestions::unknown_leader(name, &declared));
    }
    report.leaders.retain(|l| l.name == name);
    report.recommendations = derive_recommendations(report);
    Ok(())
}
