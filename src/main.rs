//! # BMAD Provisioner CLI
//!
//! Binary entry point for the `bmad-provisioner` command-line tool.
//!
//! It parses arguments with `clap`, dispatches to a command and lets
//! `anyhow` report failures; any error exits with status 1. All
//! reconciliation logic lives in the `bmad_provisioner` library so the
//! binary stays a thin rendering layer.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
