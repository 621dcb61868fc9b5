//! Resolve command implementation
//!
//! Prints the pack format the rule table assigns to a game version, or fails
//! with the reason the version could not be resolved.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use packsmith::defaults::StaticTables;
use packsmith::version::{resolve, Resolution};

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Game version, e.g. 1.21.4
    pub version: String,

    /// Replace the built-in pack format rule table
    #[arg(long, value_name = "PATH")]
    pub pack_formats: Option<PathBuf>,
}

/// Resolve `version`, turning an unresolved outcome into an error
pub fn pack_format_for(args: &ResolveArgs) -> Result<u32> {
    let tables = StaticTables::from_files(args.pack_formats.as_deref(), None)?;
    match resolve(&args.version, &tables.pack_formats) {
        Resolution::Format(id) => Ok(id),
        Resolution::Unresolved(reason) => {
            anyhow::bail!("Cannot resolve version \"{}\": {}", args.version, reason)
        }
    }
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    println!("{}", pack_format_for(&args)?);
    Ok(())
}
