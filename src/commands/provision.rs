//! # Provision Command Implementation
//!
//! Validates the manifest, runs the gap analysis, and then reconciles every
//! generated reference table with the installation through the merge
//! engine. When the framework version cannot be detected the user is asked
//! to confirm first, unless `--yes` or `--dry-run` is given.

use anyhow::Result;
use clap::Args;
use dialoguer::Confirm;

use super::{analyze_project, ManifestArgs};
use bmad_provisioner::generator::CatalogGenerator;
use bmad_provisioner::output::{emoji, OutputConfig};
use bmad_provisioner::provision::{ProvisionReport, Provisioner};
use bmad_provisioner::suggestions;

/// Reconcile every generated reference table with the installation
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Compute the merges without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the `provision` command.
pub fn execute(args: ProvisionArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let (manifest, root) = args.manifest.load_valid()?;

    if args.dry_run {
        println!("{} Dry run mode - no changes will be made", emoji(&out, "🔍", "[DRY-RUN]"));
    }
    println!("{} Provisioning reference data...", emoji(&out, "🚀", "[RUN]"));

    let (_, report) = analyze_project(&manifest, &root)?;

    if let (Some(detected), Some(false)) = (&report.bmad_version, report.version_compatible) {
        return Err(suggestions::incompatible_version(
            detected,
            &manifest.project.bmad_version,
        ));
    }

    if report.bmad_version.is_none() && !args.yes && !args.dry_run {
        println!("{}  Warning: BMAD version not detected", emoji(&out, "⚠️", "[WARN]"));
        let proceed = Confirm::new()
            .with_prompt("Continue anyway?")
            .default(false)
            .interact()?;
        if !proceed {
            println!("{} Provisioning cancelled", emoji(&out, "❌", "[ERR]"));
            return Ok(());
        }
    }

    println!(
        "\n{} Leaders to provision: {}",
        emoji(&out, "📦", "[INFO]"),
        manifest.project.leaders.len()
    );
    for leader in &manifest.project.leaders {
        println!(
            "   - {} ({}): {} specialists",
            leader.name,
            leader.domain,
            leader.specialists.len()
        );
    }

    let provisioned = Provisioner::new(&root).provision(
        &manifest,
        &CatalogGenerator::default(),
        args.dry_run,
    )?;

    print_summary(&out, &provisioned);

    let failed = provisioned.failures().count();
    if failed > 0 {
        return Err(suggestions::provisioning_failed(failed));
    }
    Ok(())
}

fn print_summary(out: &OutputConfig, report: &ProvisionReport) {
    println!("\n{}", "=".repeat(50));
    println!("{} Provisioning Summary", emoji(out, "📊", "[INFO]"));
    println!("{}", "=".repeat(50));

    for table in &report.tables {
        match &table.outcome {
            Ok(result) => println!(
                "{} {}/{}: {} new, {} updated, {} preserved, {} custom",
                emoji(out, "✅", "[OK]"),
                table.leader,
                table.file_name,
                result.new_rows,
                result.updated_rows,
                result.preserved_rows,
                result.custom_rows
            ),
            Err(e) => println!(
                "{} {}/{}: {}",
                emoji(out, "❌", "[ERR]"),
                table.leader,
                table.file_name,
                e
            ),
        }
    }
    for leader in &report.skipped_leaders {
        println!(
            "{} {}: not installed, skipped",
            emoji(out, "⏭️", "[SKIP]"),
            leader
        );
    }

    println!(
        "\nTotal: {} tables reconciled, {} failed, {} leaders skipped",
        report.succeeded(),
        report.failures().count(),
        report.skipped_leaders.len()
    );
    if report.dry_run {
        println!("\n{} Dry run complete - no changes made", emoji(out, "✅", "[OK]"));
    }
}
