//! Shared test utilities for the pipesync workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`project::TestProject`] builder for content directories

pub mod project;

/// A minimal descriptor with a content marker and no references.
pub const MINIMAL_DESCRIPTOR: &str = "\
#----------------------------- Global Properties ----------------------------#

/outputDir:bin/$(Platform)
/intermediateDir:obj/$(Platform)
/platform:DesktopGL
/config:
/profile:Reach
/compress:False

#-------------------------------- References --------------------------------#


#---------------------------------- Content ---------------------------------#

";
