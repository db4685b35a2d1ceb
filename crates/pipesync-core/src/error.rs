//! Error types for pipesync-core

use std::path::PathBuf;

/// Result type for pipesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Run-level errors. Anything that only affects a single file or reference
/// is reported as a [`crate::Diagnostic`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Descriptor file missing or not a `.mgcb` file
    #[error("Unable to find valid content file at {path}")]
    InvalidDescriptor { path: PathBuf },

    /// Project file missing or not a `.csproj` file
    #[error("Unable to find valid project file at {path}")]
    InvalidProject { path: PathBuf },

    /// Glob expression could not be compiled
    #[error("Invalid pattern '{expression}': {message}")]
    InvalidPattern { expression: String, message: String },

    /// Capability manifest could not be parsed
    #[error("Invalid capability manifest at {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from pipesync-fs
    #[error(transparent)]
    Fs(#[from] pipesync_fs::Error),
}
