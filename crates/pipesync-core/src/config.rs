//! Per-descriptor configuration (`pipesync.json` / `pipesync.toml`).
//!
//! The configuration lives next to the descriptor it applies to:
//!
//! ```json
//! {
//!   "exclude": ["bin/", "obj/", "*.psd"],
//!   "logSkipped": false,
//!   "references": ["MonoGame.Extended.Content.Pipeline"],
//!   "overrides": {
//!     "*.fnt": "copy",
//!     "maps/*.json": { "importer": "TiledMapImporter", "processor": "TiledMapProcessor" },
//!     "ui/*.png": { "processorParams": { "PremultiplyAlpha": false } }
//!   }
//! }
//! ```

use pipesync_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Config file names looked up next to a descriptor, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["pipesync.json", "pipesync.toml"];

/// Settings controlling one descriptor's synchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Expressions for files that never get an entry.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Log files and references skipped because nothing needed doing.
    #[serde(default = "default_log_skipped")]
    pub log_skipped: bool,

    /// Override expression to rule, in declaration order.
    ///
    /// Kept as raw values so a malformed rule only affects the files it
    /// matches instead of failing the whole config.
    #[serde(default)]
    pub overrides: Map<String, Value>,

    /// Library names whose `/reference:` lines are managed.
    #[serde(default)]
    pub references: Vec<String>,
}

fn default_exclude() -> Vec<String> {
    vec!["bin/".to_string(), "obj/".to_string()]
}

fn default_log_skipped() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            log_skipped: default_log_skipped(),
            overrides: Map::new(),
            references: Vec::new(),
        }
    }
}

impl Config {
    /// Find the config file for a descriptor directory, if any.
    pub fn locate(descriptor_dir: &NormalizedPath) -> Option<NormalizedPath> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| descriptor_dir.join(name))
            .find(NormalizedPath::is_file)
    }

    /// Load the config for a descriptor directory.
    ///
    /// Falls back to defaults when no config file exists. A config file
    /// that exists but fails to parse is an error.
    pub fn load_for(descriptor_dir: &NormalizedPath) -> Result<Self> {
        match Self::locate(descriptor_dir) {
            Some(path) => {
                let config = ConfigStore::new().load(&path)?;
                tracing::info!("Using config from {}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config");
                Ok(Self::default())
            }
        }
    }
}
