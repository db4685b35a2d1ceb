//! Command implementations for pipesync-cli

pub mod sync;

pub use sync::{SyncArgs, run_sync};
