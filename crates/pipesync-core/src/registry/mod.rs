//! Capability registry: which importers and processors are available.
//!
//! The registry is a read-only snapshot built once per descriptor run.
//! Capabilities come from an explicit registration list: the stock
//! pipeline builtins first, then capability manifests shipped next to
//! referenced libraries, in descriptor order.

mod builtins;
mod manifest;
mod provider;
mod store;
mod types;

pub use builtins::{BUILTIN_IMPORTER_COUNT, builtin_importers, builtin_processors};
pub use manifest::{CapabilityManifest, ImporterEntry, MANIFEST_SUFFIX, manifest_path_for};
pub use provider::{CapabilityProvider, StandardCapabilities};
pub use store::CapabilityRegistry;
pub use types::{ImporterDescriptor, normalize_extension};
