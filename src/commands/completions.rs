//! # Completions Command Implementation
//!
//! Prints a shell completion script for `bmad-provisioner` to stdout. The
//! script is generated by `clap_complete` from the same `clap` definition
//! the binary parses with, so every subcommand, the shared `-c/--config` and
//! `-p/--project-root` flags and the global `--color` / `--log-level` flags
//! complete without extra work.
//!
//! ## Supported Shells
//!
//! Every shell `clap_complete::Shell` knows: bash, zsh, fish, powershell and
//! elvish.
//!
//! ```bash
//! bmad-provisioner completions bash > ~/.local/share/bash-completion/completions/bmad-provisioner
//! bmad-provisioner completions zsh > ~/.zfunc/_bmad-provisioner
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
///
/// # Behavior
/// - Writes the script for `args.shell` to stdout and nothing else, so the
///   output can be redirected straight into a completion file
/// - Uses the binary name from the `clap` definition, which keeps the
///   completion function name in step with the installed command
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
