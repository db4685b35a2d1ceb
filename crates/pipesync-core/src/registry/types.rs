//! Capability descriptor types

use serde::{Deserialize, Serialize};

/// An importer as seen by the synchronization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterDescriptor {
    /// Name written to `/importer:` lines.
    pub name: String,
    /// Handled extensions, lowercase with a leading dot.
    pub extensions: Vec<String>,
    /// Processor used when no override names one.
    pub default_processor: String,
}

impl ImporterDescriptor {
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        extensions: &[S],
        default_processor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extensions: extensions
                .iter()
                .map(|e| normalize_extension(e.as_ref()))
                .collect(),
            default_processor: default_processor.into(),
        }
    }

    /// Whether this importer handles `extension` (with or without dot).
    pub fn handles(&self, extension: &str) -> bool {
        let extension = normalize_extension(extension);
        self.extensions.iter().any(|e| *e == extension)
    }
}

/// Lowercase an extension and give it a leading dot.
pub fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
