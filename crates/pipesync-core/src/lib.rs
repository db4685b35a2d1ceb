//! Content descriptor synchronization engine
//!
//! Keeps a content pipeline descriptor (`.mgcb`) in step with the files
//! on disk next to it:
//!
//! - **Descriptor model**: line-preserving parse, query and append
//! - **Patterns**: glob-style selectors for exclusions and overrides
//! - **Capability registry**: importers and processors available to a run
//! - **Overrides**: per-file importer, processor and parameter choices
//! - **References**: `/reference:` lines kept at the installed package version
//! - **Sync**: the per-descriptor pipeline and its report
//!
//! # Architecture
//!
//! ```text
//!                 pipesync-cli
//!                      |
//!                pipesync-core
//!                      |
//!                 pipesync-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pipesync_core::{SyncOptions, Synchronizer};
//! use pipesync_fs::NormalizedPath;
//!
//! let report = Synchronizer::new(None, SyncOptions::default())
//!     .run(&NormalizedPath::new("Content/Content.mgcb"))?;
//! println!("{} entries added", report.added.len());
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod overrides;
pub mod pattern;
pub mod project;
pub mod references;
pub mod registry;
pub mod sync;

pub use config::Config;
pub use descriptor::Descriptor;
pub use error::{Error, Result};
pub use overrides::{OverrideAction, OverrideResolver, OverrideRule};
pub use pattern::Pattern;
pub use project::{NuGetResolver, ProjectFile};
pub use references::{ReferenceReconciler, ReferenceResolver, library_name};
pub use registry::{
    CapabilityManifest, CapabilityProvider, CapabilityRegistry, ImporterDescriptor,
    StandardCapabilities,
};
pub use sync::{
    AddedEntry, Diagnostic, EntryAction, Preview, ReferenceChange, SkipReason, SkippedFile,
    SyncEngine, SyncOptions, SyncReport, Synchronizer,
};
