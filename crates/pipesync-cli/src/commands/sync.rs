//! The sync command
//!
//! Runs every requested descriptor in turn and prints what happened to
//! each one. A failing descriptor does not stop the others unless
//! `--fail-fast` is given.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde_json::{Value, json};
use similar::TextDiff;

use pipesync_core::{
    EntryAction, NuGetResolver, ProjectFile, ReferenceResolver, SyncOptions, SyncReport,
    Synchronizer,
};
use pipesync_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// What to synchronize and how
#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    /// `;`-separated descriptor paths, relative to the working directory
    pub descriptors: String,
    pub project: Option<PathBuf>,
    pub fail_fast: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// Outcome of one descriptor
enum Outcome {
    Synced(SyncReport),
    Failed { descriptor: String, error: String },
}

/// Run the sync command.
///
/// Returns `Ok(false)` when at least one descriptor failed.
///
/// # Errors
///
/// Fails without touching any descriptor if the descriptor list is empty or
/// the project file is invalid.
pub fn run_sync(cwd: &Path, args: &SyncArgs) -> Result<bool> {
    let descriptors = parse_descriptor_list(cwd, &args.descriptors);
    if descriptors.is_empty() {
        return Err(CliError::user("No content files given"));
    }

    let resolver = match &args.project {
        Some(project) => load_resolver(&cwd.join(project))?,
        None => None,
    };

    let synchronizer = Synchronizer::new(
        resolver.as_ref().map(|r| r as &dyn ReferenceResolver),
        SyncOptions {
            dry_run: args.dry_run,
        },
    );

    let mut outcomes = Vec::with_capacity(descriptors.len());
    for descriptor in &descriptors {
        match synchronizer.run(descriptor) {
            Ok(report) => outcomes.push(Outcome::Synced(report)),
            Err(e) => {
                tracing::error!("{}", e);
                outcomes.push(Outcome::Failed {
                    descriptor: descriptor.to_string(),
                    error: e.to_string(),
                });
                if args.fail_fast {
                    break;
                }
            }
        }
    }

    if args.json {
        print_json(&outcomes)?;
    } else {
        print_summary(&outcomes, args.dry_run);
    }

    Ok(outcomes
        .iter()
        .all(|o| matches!(o, Outcome::Synced(_))))
}

/// Split a `;`-separated list, resolve each entry against `cwd` and drop
/// duplicates, keeping first-seen order. Existing files are compared by
/// their canonical path.
pub fn parse_descriptor_list(cwd: &Path, list: &str) -> Vec<NormalizedPath> {
    let mut paths: Vec<NormalizedPath> = Vec::new();
    for entry in list.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let joined = cwd.join(entry);
        let path = NormalizedPath::canonicalize(&joined)
            .unwrap_or_else(|_| NormalizedPath::new(&joined));
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

fn load_resolver(project_path: &Path) -> Result<Option<NuGetResolver>> {
    let project = ProjectFile::load(&NormalizedPath::new(project_path))?;
    let resolver = NuGetResolver::for_project(&project);
    if resolver.is_none() {
        tracing::warn!(
            "Unable to locate the NuGet global packages folder, references will not be synchronized"
        );
    }
    Ok(resolver)
}

fn print_json(outcomes: &[Outcome]) -> Result<()> {
    let values = outcomes
        .iter()
        .map(|outcome| match outcome {
            Outcome::Synced(report) => serde_json::to_value(report),
            Outcome::Failed { descriptor, error } => Ok(json!({
                "descriptor": descriptor,
                "error": error,
            })),
        })
        .collect::<std::result::Result<Vec<Value>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_summary(outcomes: &[Outcome], dry_run: bool) {
    for outcome in outcomes {
        match outcome {
            Outcome::Synced(report) => print_report(report, dry_run),
            Outcome::Failed { descriptor, error } => {
                println!("{} {}", "FAILED".red().bold(), descriptor);
                println!("   {} {}", "!".red(), error);
            }
        }
    }
}

fn print_report(report: &SyncReport, dry_run: bool) {
    println!("{} {}", "=>".blue().bold(), report.descriptor);

    for change in &report.references {
        match &change.from {
            Some(from) => println!(
                "   {} reference {}: {} -> {}",
                "~".yellow(),
                change.library.cyan(),
                from.dimmed(),
                change.to
            ),
            None => println!(
                "   {} reference {}: {}",
                "+".green(),
                change.library.cyan(),
                change.to
            ),
        }
    }

    for entry in &report.added {
        let action = match &entry.action {
            EntryAction::Copy => "copy".to_string(),
            EntryAction::Build {
                importer,
                processor,
                ..
            } => format!("{importer}, {processor}"),
        };
        println!("   {} {} ({})", "+".green(), entry.path, action.dimmed());
    }

    for diagnostic in &report.diagnostics {
        println!("   {} {}", "!".yellow(), diagnostic.message);
    }

    if let Some(preview) = &report.preview {
        let diff = TextDiff::from_lines(&preview.before, &preview.after);
        let mut unified = diff.unified_diff();
        unified
            .context_radius(2)
            .header(&report.descriptor, &report.descriptor);
        print!("{unified}");
    }

    let status = if !report.changed {
        "OK".green().bold()
    } else if dry_run {
        "DRY-RUN".yellow().bold()
    } else {
        "UPDATED".green().bold()
    };
    println!(
        "{} {} entries added, {} references changed, {} warnings",
        status,
        report.added.len(),
        report.references.len(),
        report.diagnostics.len()
    );
}
