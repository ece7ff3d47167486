//! # Validate Command Implementation
//!
//! Parses the skills manifest and checks it against the project root
//! without touching any installed file. Every problem is reported in one
//! batch; any problem makes the command fail.

use anyhow::Result;
use clap::Args;

use super::ManifestArgs;
use bmad_provisioner::output::{emoji, OutputConfig};
use bmad_provisioner::suggestions;

/// Validate the skills manifest against the project
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating manifest: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.manifest.config.display()
    );

    let (manifest, root) = match args.manifest.load() {
        Ok(loaded) => loaded,
        Err(e) => {
            println!("{} Failed to load manifest", emoji(&out, "❌", "[ERR]"));
            return Err(e);
        }
    };

    let project = &manifest.project;
    let specialists: usize = project.leaders.iter().map(|l| l.specialists.len()).sum();
    println!("\n{} Manifest Summary:", emoji(&out, "📊", "[INFO]"));
    println!("   Project: {}", project.name);
    println!("   Root: {}", root.display());
    println!("   Leaders: {}", project.leaders.len());
    println!("   Specialists: {}", specialists);
    if !project.customizations.is_empty() {
        println!("   Customized leaders: {}", project.customizations.len());
    }
    if !project.integrations().is_empty() {
        println!("   Workflow integrations: {}", project.integrations().len());
    }

    let errors = manifest.validate(Some(&root));
    if errors.is_empty() {
        println!("\n{} Manifest is valid", emoji(&out, "✅", "[OK]"));
        return Ok(());
    }

    println!("\n{} Manifest validation failed:", emoji(&out, "❌", "[ERR]"));
    for error in &errors {
        println!("   - {}", error);
    }
    Err(suggestions::validation_failed(&errors))
}
