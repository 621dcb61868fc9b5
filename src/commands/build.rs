//! Build command implementation
//!
//! The build command runs one session from a manifest:
//! 1. Load the manifest and the static tables
//! 2. Create the datapack (resolves the pack format, writes `pack.mcmeta`)
//! 3. Stage every script, recipe, tag and elixirum document
//! 4. Confirm tags and flush, or print the plan in dry-run mode

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use packsmith::config;
use packsmith::datapack::{Datapack, Destination, PackSettings};
use packsmith::defaults::{StaticTables, DEFAULT_MANIFEST};
use packsmith::output::{status_line, OutputConfig, Status};

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the build manifest
    #[arg(short, long, value_name = "PATH", env = "PACKSMITH_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Output directory (defaults to the manifest's `output`, then its directory)
    #[arg(short, long, value_name = "PATH", env = "PACKSMITH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Write `<output>/<name>.zip` instead of a directory
    #[arg(short, long)]
    pub archive: bool,

    /// Replace the built-in pack format rule table
    #[arg(long, value_name = "PATH")]
    pub pack_formats: Option<PathBuf>,

    /// Replace the built-in essence blacklist seed
    #[arg(long, value_name = "PATH")]
    pub blacklist_seed: Option<PathBuf>,

    /// Stage everything and print the plan without writing the pack
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show detailed progress information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Where the pack goes: the flag, else the manifest's `output` relative to
/// the manifest, else the manifest's directory.
fn output_dir(flag: Option<PathBuf>, manifest_output: Option<&Path>, manifest_path: &Path) -> PathBuf {
    let manifest_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match (flag, manifest_output) {
        (Some(dir), _) => dir,
        (None, Some(dir)) => manifest_dir.join(dir),
        (None, None) => manifest_dir.to_path_buf(),
    }
}

/// Execute the build command
pub fn execute(args: BuildArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let say = |status: Status, message: &str| {
        if !args.quiet {
            println!("{}", status_line(output, status, message));
        }
    };

    let manifest_path = args
        .manifest
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
    if !manifest_path.exists() {
        anyhow::bail!("Manifest file not found: {}", manifest_path.display());
    }

    if args.verbose {
        say(Status::Info, &format!("Reading manifest {}", manifest_path.display()));
    }
    let manifest = config::from_file(&manifest_path)
        .with_context(|| format!("Failed to load {}", manifest_path.display()))?;
    let tables = StaticTables::from_files(args.pack_formats.as_deref(), args.blacklist_seed.as_deref())?;

    let mut settings = PackSettings::from_manifest(
        &manifest,
        output_dir(args.output.clone(), manifest.output.as_deref(), &manifest_path),
    )?;
    if args.archive {
        settings.destination = Destination::Archive;
    }
    if args.dry_run {
        settings.destination = Destination::Discard;
        say(Status::Info, "Dry run: nothing will be written");
    }

    let mut datapack = Datapack::new(settings, &tables)?;
    datapack.apply(&manifest)?;

    if args.dry_run {
        let tags = datapack.confirm_tags()?;
        let ctx = datapack.context();
        for folder in ctx.folders() {
            say(Status::Plan, &format!("mkdir data/{}", folder));
        }
        for (path, _) in ctx.files().iter() {
            say(Status::Plan, &format!("write data/{}", path));
        }
        say(
            Status::Success,
            &format!(
                "Planned {} folders and {} files ({} tags) for \"{}\" with pack format {}",
                ctx.folders().len(),
                ctx.files().len(),
                tags,
                datapack.name(),
                datapack.pack_format()
            ),
        );
        return Ok(());
    }

    let name = datapack.name().to_string();
    match datapack.save() {
        Ok(report) => {
            say(
                Status::Success,
                &format!(
                    "Built \"{}\" in {:.2}s: {} folders, {} files",
                    name,
                    start_time.elapsed().as_secs_f64(),
                    report.folders,
                    report.files
                ),
            );
            if let Some(dir) = &report.pack_dir {
                say(Status::Info, &format!("Pack written to {}", dir.display()));
            }
            if let Some(archive) = &report.archive {
                say(Status::Info, &format!("Archive written to {}", archive.display()));
            }
            Ok(())
        }
        Err(e) => {
            say(Status::Failure, &format!("Build of \"{}\" failed", name));
            Err(e.into())
        }
    }
}
