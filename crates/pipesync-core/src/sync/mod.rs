//! Descriptor synchronization
//!
//! - **engine**: per-file entry decisions and reference reconciliation
//! - **runner**: the load, reconcile, discover, sync, write pipeline for one descriptor
//! - **report**: what a run changed, skipped and warned about

mod engine;
mod report;
mod runner;

pub use engine::SyncEngine;
pub use report::{
    AddedEntry, Diagnostic, EntryAction, Preview, ReferenceChange, SkipReason, SkippedFile,
    SyncReport,
};
pub use runner::{SyncOptions, Synchronizer};
