//! # Merge Command Implementation
//!
//! Merges one desired CSV table into an installed one with the same rules
//! `provision` uses: user-only rows are kept, user-edited rows are kept,
//! unmodified rows take the desired version and new rows are added.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use bmad_provisioner::merge::{merge_table_file, plan_table_file, MergeResult, DEFAULT_KEY_COLUMN};
use bmad_provisioner::output::{emoji, status_marker, OutputConfig};
use bmad_provisioner::table::RowCollection;

/// Merge a desired CSV table into an installed one, keeping user rows
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Freshly generated table
    #[arg(long, value_name = "FILE")]
    pub desired: PathBuf,

    /// Installed table to update (created when missing)
    #[arg(long, value_name = "FILE")]
    pub target: PathBuf,

    /// Zero-based index of the key column
    #[arg(long, value_name = "N", default_value_t = DEFAULT_KEY_COLUMN)]
    pub key_column: usize,

    /// Show the merge without writing the target
    #[arg(long)]
    pub dry_run: bool,

    /// Also list the decision taken for every row
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let desired = RowCollection::load(&args.desired)
        .with_context(|| format!("Failed to read desired table {}", args.desired.display()))?
        .ok_or_else(|| anyhow::anyhow!("Desired table not found: {}", args.desired.display()))?;

    let result = if args.dry_run {
        println!("{} Dry run mode - no changes will be made", emoji(&out, "🔍", "[DRY-RUN]"));
        plan_table_file(&args.target, &desired, args.key_column)?.result
    } else {
        merge_table_file(&args.target, &desired, args.key_column)?
    };

    print_result(&out, &args, &result);
    Ok(())
}

fn print_result(out: &OutputConfig, args: &MergeArgs, result: &MergeResult) {
    println!(
        "{} {} {}",
        emoji(out, "✅", "[OK]"),
        if args.dry_run { "Would merge" } else { "Merged" },
        args.target.display()
    );
    println!("   New rows: {}", result.new_rows);
    println!("   Updated rows: {}", result.updated_rows);
    println!("   Preserved user edits: {}", result.preserved_rows);
    println!("   Custom rows kept: {}", result.custom_rows);
    println!("   Total rows: {}", result.total_rows());
    if result.dropped_rows > 0 {
        println!(
            "{}  Dropped rows (blank or duplicate key): {}",
            emoji(out, "⚠️", "[WARN]"),
            result.dropped_rows
        );
    }

    if args.verbose {
        println!();
        for outcome in &result.outcomes {
            println!("   {} {}", status_marker(out, outcome.change_type), outcome.key);
        }
    }
}
