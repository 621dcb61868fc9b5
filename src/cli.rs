//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// packsmith - Build game data packs from a declarative manifest
#[derive(Parser, Debug)]
#[command(name = "packsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a datapack from a manifest
    Build(commands::build::BuildArgs),

    /// Print the pack format for a game version
    Resolve(commands::resolve::ResolveArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let verbose = matches!(&self.command, Commands::Build(args) if args.verbose);
        init_logging(&self.log_level, verbose);
        let output = packsmith::output::OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Build(args) => commands::build::execute(args, &output),
            Commands::Resolve(args) => commands::resolve::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Parse a `--log-level` value, defaulting to `warn` for unknown levels.
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Warn)
}

/// Initialize `env_logger`. `RUST_LOG` takes precedence over the flag, and
/// `--verbose` raises the flag's level to at least `debug`.
fn init_logging(log_level: &str, verbose: bool) {
    let mut level = parse_level(log_level);
    if verbose && level < LevelFilter::Debug {
        level = LevelFilter::Debug;
    }
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    // A second initialization (e.g. in tests) is harmless.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .try_init();
}
