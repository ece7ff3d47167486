//! # Reference Data Provisioning
//!
//! Runs every generated reference table through the merge engine so that
//! re-provisioning picks up template changes without discarding user rows.
//!
//! Each table is reconciled on its own. A failure while reading or writing
//! one table is recorded for that table and the remaining tables are still
//! processed. Leaders that are not installed are skipped; creating a leader
//! is the job of the scaffolding step, not of this module.

use std::path::PathBuf;

use log::{info, warn};

use crate::error::Result;
use crate::generator::ArtifactGenerator;
use crate::layout::InstalledLayout;
use crate::manifest::Manifest;
use crate::merge::{merge_table_file, plan_table_file, MergeResult};

/// Outcome of reconciling one table
#[derive(Debug)]
pub struct TableProvision {
    pub leader: String,
    pub file_name: String,
    pub path: PathBuf,
    /// The merge that was applied, or only planned under dry-run
    pub outcome: Result<MergeResult>,
}

impl TableProvision {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Summary of a provisioning run
#[derive(Debug, Default)]
pub struct ProvisionReport {
    pub dry_run: bool,
    pub tables: Vec<TableProvision>,
    /// Declared leaders without an installed directory
    pub skipped_leaders: Vec<String>,
}

impl ProvisionReport {
    pub fn failures(&self) -> impl Iterator<Item = &TableProvision> {
        self.tables.iter().filter(|t| !t.is_ok())
    }

    pub fn succeeded(&self) -> usize {
        self.tables.iter().filter(|t| t.is_ok()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Applies generated reference data to an installation
#[derive(Debug, Clone)]
pub struct Provisioner {
    layout: InstalledLayout,
}

impl Provisioner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: InstalledLayout::new(project_root),
        }
    }

    /// Merge (or with `dry_run`, plan) every generated table of every
    /// installed leader.
    ///
    /// Generator failures abort the run before anything is written; table
    /// I/O failures are recorded per table.
    pub fn provision(
        &self,
        manifest: &Manifest,
        generator: &dyn ArtifactGenerator,
        dry_run: bool,
    ) -> Result<ProvisionReport> {
        let mut bundles = Vec::with_capacity(manifest.project.leaders.len());
        for leader in &manifest.project.leaders {
            bundles.push((leader, generator.generate(leader)?));
        }

        let mut report = ProvisionReport {
            dry_run,
            ..ProvisionReport::default()
        };

        for (leader, bundle) in bundles {
            let layout = self.layout.leader(&leader.name);
            if !layout.root().exists() {
                warn!("Skipping {}: leader is not installed", leader.name);
                report.skipped_leaders.push(leader.name.clone());
                continue;
            }

            for table in bundle.tables {
                let path = match layout.table(&table.file_name) {
                    Ok(path) => path,
                    Err(e) => {
                        report.tables.push(TableProvision {
                            leader: leader.name.clone(),
                            path: layout.data_dir(),
                            file_name: table.file_name,
                            outcome: Err(e),
                        });
                        continue;
                    }
                };

                let outcome = if dry_run {
                    plan_table_file(&path, &table.rows, table.key_column).map(|plan| plan.result)
                } else {
                    merge_table_file(&path, &table.rows, table.key_column)
                };
                if let Err(e) = &outcome {
                    warn!("{}", e);
                }

                report.tables.push(TableProvision {
                    leader: leader.name.clone(),
                    file_name: table.file_name,
                    path,
                    outcome,
                });
            }
        }

        info!(
            "Provisioned {} tables ({} failed, {} leaders skipped){}",
            report.succeeded(),
            report.tables.len() - report.succeeded(),
            report.skipped_leaders.len(),
            if dry_run { " [dry run]" } else { "" }
        );

        Ok(report)
    }
}
