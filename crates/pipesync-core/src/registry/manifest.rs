//! Capability manifests shipped alongside referenced libraries.
//!
//! A referenced library `libs/Aseprite.dll` may provide
//! `libs/Aseprite.pipeline.toml`:
//!
//! ```toml
//! processors = ["AsepriteProcessor"]
//!
//! [[importers]]
//! name = "AsepriteImporter"
//! extensions = [".ase", ".aseprite"]
//! default_processor = "AsepriteProcessor"
//! ```

use pipesync_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use super::{CapabilityRegistry, ImporterDescriptor};
use crate::{Error, Result};

/// File name suffix replacing a library's extension.
pub const MANIFEST_SUFFIX: &str = ".pipeline.toml";

/// One `[[importers]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterEntry {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    pub default_processor: String,
}

/// Capabilities declared by one library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityManifest {
    #[serde(default)]
    pub importers: Vec<ImporterEntry>,
    #[serde(default)]
    pub processors: Vec<String>,
}

impl CapabilityManifest {
    /// Load a manifest from a TOML file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        ConfigStore::new().load(path).map_err(|e| match e {
            pipesync_fs::Error::ConfigParse { message, .. } => Error::InvalidManifest {
                path: path.to_native(),
                message,
            },
            other => Error::Fs(other),
        })
    }

    /// Add every declared capability to `registry`, keeping declaration
    /// order.
    pub fn register_into(&self, registry: &mut CapabilityRegistry) {
        for entry in &self.importers {
            registry.register_importer(ImporterDescriptor::new(
                entry.name.clone(),
                entry.extensions.as_slice(),
                entry.default_processor.clone(),
            ));
        }
        for processor in &self.processors {
            registry.register_processor(processor.clone());
        }
    }
}

/// Manifest location for a library path: same directory, same stem.
pub fn manifest_path_for(library: &NormalizedPath) -> NormalizedPath {
    let stem = library.file_stem().unwrap_or_default();
    let file_name = format!("{stem}{MANIFEST_SUFFIX}");
    match library.parent() {
        Some(parent) => parent.join(&file_name),
        None => NormalizedPath::new(file_name),
    }
}
