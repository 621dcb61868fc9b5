//! # packsmith CLI
//!
//! Binary entry point for the `packsmith` command-line tool. It parses
//! arguments with `clap`, runs the selected command, and turns errors into
//! a non-zero exit status.
//!
//! All pack building logic lives in the `packsmith` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
