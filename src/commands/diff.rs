//! # Diff Command Implementation
//!
//! Shows what provisioning would do, per leader: a `CREATE` block listing
//! every file of a leader that is not installed yet, and an `UPDATE` block
//! listing the missing or outdated artifacts of an installed leader.
//! Read-only.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::{analyze_project, filter_leader, ManifestArgs};
use bmad_provisioner::analyzer::DesiredLeader;
use bmad_provisioner::layout::InstalledLayout;
use bmad_provisioner::output::{emoji, OutputConfig};

/// Show what provisioning would create or update
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Only show changes for this leader
    #[arg(long, value_name = "NAME")]
    pub leader: Option<String>,
}

/// Execute the `diff` command.
pub fn execute(args: DiffArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let (manifest, root) = args.manifest.load_valid()?;

    println!("{} Computing differences...", emoji(&out, "🔍", "[SCAN]"));
    let (desired, mut report) = analyze_project(&manifest, &root)?;
    filter_leader(&manifest, &mut report, args.leader.as_deref())?;

    let layout = InstalledLayout::new(&root);
    let mut changes = 0;

    println!("\nChanges that would be made:");
    for status in &report.leaders {
        if !status.installed {
            changes += 1;
            println!("\n{} CREATE: {}", emoji(&out, "📦", "+"), status.name);
            if let Some(leader) = desired.leaders.iter().find(|d| d.leader.name == status.name) {
                for file in planned_files(&layout, leader) {
                    println!("   - {}", file);
                }
            }
        } else if status.needs_update() {
            changes += 1;
            println!("\n{} UPDATE: {}", emoji(&out, "📝", "~"), status.name);
            for artifact in status.artifacts.iter().filter(|a| a.change_type.needs_action()) {
                println!("   - {}: {}", artifact.file_name(), artifact.details);
            }
        }
    }

    if changes == 0 {
        println!("\n{} No changes - installation matches the manifest", emoji(&out, "✅", "[OK]"));
    }
    Ok(())
}

/// Files a fresh install of `desired` would create, relative to the leader root
fn planned_files(layout: &InstalledLayout, desired: &DesiredLeader) -> Vec<String> {
    let leader_layout = layout.leader(&desired.leader.name);
    let mut paths = vec![
        leader_layout.agent_file(),
        leader_layout.workflow_file(),
        leader_layout.routing_rules(),
    ];
    paths.extend(
        desired
            .leader
            .specialists
            .iter()
            .map(|s| leader_layout.specialist_file(&s.id)),
    );
    paths.extend(desired.tables.iter().filter_map(|t| leader_layout.table(&t.file_name).ok()));

    paths
        .iter()
        .map(|path| relative(path, leader_layout.root()))
        .collect()
}

fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
