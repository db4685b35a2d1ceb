//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// pipesync - keep content pipeline descriptors in step with the files on disk
///
/// Examples:
///   pipesync Content/Content.mgcb
///   pipesync "Content/Content.mgcb;Levels/Levels.mgcb" Game.csproj
///   pipesync Content/Content.mgcb --dry-run
#[derive(Parser, Debug)]
#[command(name = "pipesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Descriptor files to synchronize, separated by `;`
    pub descriptors: String,

    /// Project file whose package versions drive `/reference:` lines
    pub project: Option<PathBuf>,

    /// Stop at the first descriptor that fails instead of continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// Show the changes as a diff without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
