//! # Analyze Command Implementation
//!
//! Runs the gap analysis for every declared leader and prints the report,
//! either as the human-readable summary or as JSON with `--json`.
//! Read-only.

use anyhow::Result;
use clap::Args;

use super::{analyze_project, filter_leader, ManifestArgs};
use bmad_provisioner::output::{emoji, OutputConfig};

/// Compare the manifest with the installed state
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Only report on this leader
    #[arg(long, value_name = "NAME")]
    pub leader: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the `analyze` command.
pub fn execute(args: AnalyzeArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let (manifest, root) = args.manifest.load_valid()?;

    let (_, mut report) = analyze_project(&manifest, &root)?;
    filter_leader(&manifest, &mut report, args.leader.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Analyzing project: {}",
        emoji(&out, "📊", "[INFO]"),
        manifest.project.name
    );
    println!("   Root: {}\n", root.display());
    println!("{}", report.summary(&out));
    Ok(())
}
