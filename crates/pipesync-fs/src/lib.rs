//! Filesystem abstraction for pipesync
//!
//! Provides forward-slash path handling, content discovery, format-agnostic
//! config loading and atomic descriptor writes.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use walk::discover_files;
