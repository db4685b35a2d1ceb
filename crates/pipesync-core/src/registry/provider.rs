//! Capability discovery for one descriptor run

use std::path::Path;

use pipesync_fs::NormalizedPath;

use super::{CapabilityManifest, CapabilityRegistry, manifest_path_for};

/// Builds the capability snapshot for a descriptor.
///
/// `references` are the raw `/reference:` values of the descriptor, after
/// reconciliation. Implementations must not fail: capabilities that cannot
/// be loaded are simply absent, which later shows up as "no importer found"
/// for the affected files.
pub trait CapabilityProvider {
    fn capabilities(&self, references: &[&str]) -> CapabilityRegistry;
}

/// Builtins followed by the `.pipeline.toml` manifest of each reference.
#[derive(Debug, Clone)]
pub struct StandardCapabilities {
    /// Directory relative references are resolved against.
    base_dir: NormalizedPath,
}

impl StandardCapabilities {
    pub fn new(base_dir: NormalizedPath) -> Self {
        Self { base_dir }
    }

    fn resolve(&self, reference: &str) -> NormalizedPath {
        if Path::new(reference).is_absolute() || reference.starts_with('/') {
            NormalizedPath::new(reference)
        } else {
            self.base_dir.join(reference)
        }
    }
}

impl CapabilityProvider for StandardCapabilities {
    fn capabilities(&self, references: &[&str]) -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::with_builtins();

        for reference in references {
            let library = self.resolve(reference);
            tracing::info!("Using reference {}", library);

            let manifest_path = manifest_path_for(&library);
            if !manifest_path.is_file() {
                tracing::debug!(manifest = %manifest_path, "reference ships no capability manifest");
                continue;
            }

            match CapabilityManifest::load(&manifest_path) {
                Ok(manifest) => manifest.register_into(&mut registry),
                Err(e) => {
                    tracing::warn!("Error loading capabilities for reference {}: {}", library, e);
                }
            }
        }

        tracing::info!(
            "Found possible importer types {}",
            registry
                .importers()
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        tracing::info!("Found possible processor types {}", registry.processors().join(", "));

        registry
    }
}
