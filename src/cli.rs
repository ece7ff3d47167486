//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use bmad_provisioner::defaults::DEFAULT_LOG_LEVEL;

/// BMAD Provisioner - Declarative leader/specialist skills with edit-preserving updates
#[derive(Parser, Debug)]
#[command(name = "bmad-provisioner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the skills manifest against the project
    Validate(commands::validate::ValidateArgs),

    /// Compare the manifest with the installed state
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show what provisioning would create or update
    Diff(commands::diff::DiffArgs),

    /// Merge a desired CSV table into an installed one, keeping user rows
    Merge(commands::merge::MergeArgs),

    /// Reconcile every generated reference table with the installation
    Provision(commands::provision::ProvisionArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Analyze(args) => commands::analyze::execute(args, &self.color),
            Commands::Diff(args) => commands::diff::execute(args, &self.color),
            Commands::Merge(args) => commands::merge::execute(args, &self.color),
            Commands::Provision(args) => commands::provision::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route `log` records to stderr. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when embedded in tests
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
