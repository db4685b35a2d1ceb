//! End-to-end synchronization of a single descriptor file

use pipesync_fs::{NormalizedPath, discover_files};

use crate::config::{CONFIG_FILE_NAMES, Config};
use crate::descriptor::Descriptor;
use crate::references::ReferenceResolver;
use crate::registry::{CapabilityProvider, StandardCapabilities};
use crate::{Error, Result};

use super::engine::SyncEngine;
use super::report::{Preview, SyncReport};

/// Options for a synchronization run
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// If true, compute the changes but leave the descriptor on disk untouched.
    /// The pending text is returned in [`SyncReport::preview`].
    pub dry_run: bool,
}

/// Runs the full pipeline for descriptor files.
///
/// The resolver is shared across descriptors; everything else is loaded
/// per descriptor so each one sees its own config and capabilities.
#[derive(Clone, Copy, Default)]
pub struct Synchronizer<'a> {
    resolver: Option<&'a dyn ReferenceResolver>,
    options: SyncOptions,
}

impl<'a> Synchronizer<'a> {
    pub fn new(resolver: Option<&'a dyn ReferenceResolver>, options: SyncOptions) -> Self {
        Self { resolver, options }
    }

    /// Synchronize `path` using builtins plus reference manifests.
    ///
    /// # Errors
    ///
    /// Fails if the descriptor is missing or not a `.mgcb` file, the config
    /// cannot be parsed, content discovery fails or the write fails.
    pub fn run(&self, path: &NormalizedPath) -> Result<SyncReport> {
        let descriptor_path = canonical_descriptor(path)?;
        let provider = StandardCapabilities::new(descriptor_dir(&descriptor_path));
        self.run_resolved(&descriptor_path, &provider)
    }

    /// Synchronize `path` with a custom capability source.
    pub fn run_with(
        &self,
        path: &NormalizedPath,
        provider: &dyn CapabilityProvider,
    ) -> Result<SyncReport> {
        let descriptor_path = canonical_descriptor(path)?;
        self.run_resolved(&descriptor_path, provider)
    }

    fn run_resolved(
        &self,
        descriptor_path: &NormalizedPath,
        provider: &dyn CapabilityProvider,
    ) -> Result<SyncReport> {
        let root = descriptor_dir(descriptor_path);
        tracing::info!("Using content file {}", descriptor_path);

        let mut descriptor = Descriptor::load(descriptor_path)?;
        let config = Config::load_for(&root)?;
        let engine = SyncEngine::new(&config)?;
        let mut report = SyncReport::new(descriptor_path.as_str());
        let before = descriptor.render();

        engine.reconcile_references(&mut descriptor, self.resolver, &mut report);

        let registry = provider.capabilities(&descriptor.reference_paths());

        let files = content_files(&root, descriptor_path)?;
        engine.sync(&mut descriptor, &files, &registry, &mut report);

        report.changed = descriptor.is_dirty();
        if report.changed {
            if self.options.dry_run {
                report.preview = Some(Preview {
                    before,
                    after: descriptor.render(),
                });
            } else {
                descriptor.save(descriptor_path)?;
                report.written = true;
                tracing::info!("Wrote changes to content file");
            }
        }

        tracing::info!("Done");
        Ok(report)
    }
}

impl std::fmt::Debug for Synchronizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("resolver", &self.resolver.is_some())
            .field("options", &self.options)
            .finish()
    }
}

fn canonical_descriptor(path: &NormalizedPath) -> Result<NormalizedPath> {
    NormalizedPath::canonicalize(path).map_err(|_| Error::InvalidDescriptor {
        path: path.to_native(),
    })
}

fn descriptor_dir(descriptor_path: &NormalizedPath) -> NormalizedPath {
    descriptor_path
        .parent()
        .unwrap_or_else(|| NormalizedPath::new("."))
}

/// Every file below `root` as a path relative to it. Files named like the
/// descriptor or a config file are left out wherever they sit in the tree.
fn content_files(
    root: &NormalizedPath,
    descriptor_path: &NormalizedPath,
) -> Result<Vec<NormalizedPath>> {
    let descriptor_name = descriptor_path.file_name();
    let files = discover_files(root)?
        .into_iter()
        .filter(|file| match file.file_name() {
            Some(name) => Some(name) != descriptor_name && !CONFIG_FILE_NAMES.contains(&name),
            None => true,
        })
        .filter_map(|file| file.relative_to(root))
        .collect();
    Ok(files)
}
