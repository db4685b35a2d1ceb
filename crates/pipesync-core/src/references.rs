//! Reconciliation of `/reference:` lines against resolved package versions.
//!
//! Only libraries named in the config's `references` list are managed.
//! For each of them the descriptor should carry exactly the path the
//! resolver computes for the installed version; stale paths are rewritten
//! in place and missing references are inserted after the existing ones.

use crate::descriptor::Descriptor;
use crate::sync::{ReferenceChange, SyncReport};

/// Source of library versions and their build-time artifact paths.
pub trait ReferenceResolver {
    /// Installed version of `library`, if the project declares one.
    fn version_of(&self, library: &str) -> Option<String>;

    /// Full path of the artifact for `library` at `version`.
    fn library_path(&self, library: &str, version: &str) -> String;
}

/// Library name of a reference value: its file name without extension.
pub fn library_name(reference: &str) -> &str {
    let file_name = reference
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(reference);
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Rewrites and inserts managed reference lines.
#[derive(Debug, Clone)]
pub struct ReferenceReconciler<'a> {
    configured: &'a [String],
    log_skipped: bool,
}

impl<'a> ReferenceReconciler<'a> {
    pub fn new(configured: &'a [String], log_skipped: bool) -> Self {
        Self {
            configured,
            log_skipped,
        }
    }

    /// Bring the descriptor's managed references in line with `resolver`.
    ///
    /// Without a resolver nothing can be checked, so the whole step is
    /// skipped with a single diagnostic.
    pub fn reconcile(
        &self,
        descriptor: &mut Descriptor,
        resolver: Option<&dyn ReferenceResolver>,
        report: &mut SyncReport,
    ) {
        if self.configured.is_empty() {
            return;
        }
        let Some(resolver) = resolver else {
            report.warn(
                None,
                "The config file contains references, but no valid project data was found. \
                 Please specify the location of the project file you want to use for gathering references.",
            );
            return;
        };

        let mut pending: Vec<&str> = Vec::with_capacity(self.configured.len());
        for name in self.configured {
            if !pending.contains(&name.as_str()) {
                pending.push(name);
            }
        }

        let existing: Vec<(usize, String)> = descriptor
            .reference_lines()
            .into_iter()
            .map(|(idx, value)| (idx, value.to_string()))
            .collect();

        for (index, current) in existing {
            let name = library_name(&current);
            // only the first line naming a managed library is considered
            let Some(pos) = pending.iter().position(|p| *p == name) else {
                continue;
            };
            let name = pending.remove(pos);

            let Some(version) = resolver.version_of(name) else {
                report.warn(
                    Some(name),
                    format!("Unable to find existing reference {name} in project file"),
                );
                continue;
            };

            let expected = resolver.library_path(name, &version);
            if current == expected {
                if self.log_skipped {
                    tracing::info!(
                        "Skipping reference replacement for {} which already matched",
                        expected
                    );
                }
                continue;
            }

            tracing::info!("Changing reference from {} to {}", current, expected);
            descriptor.replace_reference_line(index, &expected);
            report.references.push(ReferenceChange {
                library: name.to_string(),
                from: Some(current),
                to: expected,
            });
        }

        let mut index = descriptor.insertion_index();
        for name in pending {
            let Some(version) = resolver.version_of(name) else {
                report.warn(
                    Some(name),
                    format!("Unable to find configured reference {name} in project file"),
                );
                continue;
            };

            let path = resolver.library_path(name, &version);
            tracing::info!("Adding reference {}", path);
            descriptor.insert_reference_line(index, &path);
            index += 1;
            report.references.push(ReferenceChange {
                library: name.to_string(),
                from: None,
                to: path,
            });
        }
    }
}
