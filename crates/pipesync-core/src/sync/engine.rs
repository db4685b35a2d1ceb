//! SyncEngine implementation
//!
//! The engine decides, for every discovered content file, whether it gets
//! an entry block and with which importer and processor.

use pipesync_fs::NormalizedPath;

use crate::Result;
use crate::config::Config;
use crate::descriptor::Descriptor;
use crate::overrides::{OverrideAction, OverrideResolver};
use crate::pattern::{self, Pattern};
use crate::references::{ReferenceReconciler, ReferenceResolver};
use crate::registry::CapabilityRegistry;

use super::report::{AddedEntry, EntryAction, SkipReason, SyncReport};

/// Per-descriptor synchronization rules compiled from a [`Config`].
#[derive(Debug, Clone)]
pub struct SyncEngine {
    excludes: Vec<Pattern>,
    overrides: OverrideResolver,
    references: Vec<String>,
    log_skipped: bool,
}

impl SyncEngine {
    /// Compile the exclusion and override expressions of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] if an expression does not
    /// compile.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            excludes: pattern::compile_all(&config.exclude)?,
            overrides: OverrideResolver::from_config(&config.overrides)?,
            references: config.references.clone(),
            log_skipped: config.log_skipped,
        })
    }

    /// Whether `path` matches any exclusion expression.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excludes.iter().any(|p| p.matches(path))
    }

    /// Rewrite stale and insert missing `/reference:` lines.
    pub fn reconcile_references(
        &self,
        descriptor: &mut Descriptor,
        resolver: Option<&dyn ReferenceResolver>,
        report: &mut SyncReport,
    ) {
        ReferenceReconciler::new(&self.references, self.log_skipped)
            .reconcile(descriptor, resolver, report);
    }

    /// Append an entry block for every file that lacks one.
    ///
    /// `files` are paths relative to the descriptor directory. Files that
    /// cannot be given a valid importer and processor are skipped with a
    /// diagnostic; nothing here fails the run.
    pub fn sync(
        &self,
        descriptor: &mut Descriptor,
        files: &[NormalizedPath],
        registry: &CapabilityRegistry,
        report: &mut SyncReport,
    ) {
        for file in files {
            let path = file.as_str();

            if self.is_excluded(path) {
                if self.log_skipped {
                    tracing::info!("Skipping excluded file {}", path);
                }
                report.skip(path, SkipReason::Excluded);
                continue;
            }

            if descriptor.has_entry(path) {
                if self.log_skipped {
                    tracing::info!("Skipping file {} as it is already part of the content file", path);
                }
                report.skip(path, SkipReason::AlreadyPresent);
                continue;
            }

            let action = match self.resolve_action(file, registry) {
                Ok(action) => action,
                Err(message) => {
                    report.warn(Some(path), message);
                    continue;
                }
            };

            match &action {
                EntryAction::Copy => {
                    tracing::info!("Adding file {} with the Copy build action", path);
                    descriptor.append_copy_entry(path);
                }
                EntryAction::Build {
                    importer,
                    processor,
                    params,
                } => {
                    tracing::info!(
                        "Adding file {} with importer {} and processor {}",
                        path,
                        importer,
                        processor
                    );
                    descriptor.append_entry(path, importer, processor, params);
                }
            }
            report.added.push(AddedEntry {
                path: path.to_string(),
                action,
            });
        }
    }

    /// Pick the build action for one file, or explain why there is none.
    ///
    /// A matching override is consulted first. Names it does not give fall
    /// back to the importer registered for the file's extension and that
    /// importer's default processor.
    fn resolve_action(
        &self,
        file: &NormalizedPath,
        registry: &CapabilityRegistry,
    ) -> std::result::Result<EntryAction, String> {
        let path = file.as_str();
        let rule = self.overrides.resolve(path);

        let (importer_name, processor_name, params) = match rule.map(|r| r.action()) {
            Some(OverrideAction::Copy) => return Ok(EntryAction::Copy),
            Some(OverrideAction::Invalid { reason }) => {
                let expression = rule.map(|r| r.expression()).unwrap_or_default();
                return Err(format!(
                    "Invalid override {expression} for file {path}: {reason}"
                ));
            }
            Some(OverrideAction::Build {
                importer,
                processor,
                params,
            }) => (importer.as_deref(), processor.as_deref(), params.clone()),
            None => (None, None, Vec::new()),
        };

        let importer = match importer_name {
            Some(name) => registry
                .importer_by_name(name)
                .ok_or_else(|| format!("Override importer {name} not found for file {path}"))?,
            None => registry
                .importer_for_extension(file.extension().unwrap_or_default())
                .ok_or_else(|| format!("No importer found for file {path}"))?,
        };

        let processor = match processor_name {
            Some(name) => registry
                .processor_by_name(name)
                .ok_or_else(|| format!("Override processor {name} not found for file {path}"))?,
            None => registry
                .processor_by_name(&importer.default_processor)
                .ok_or_else(|| {
                    format!(
                        "Default processor {} of importer {} not found for file {path}",
                        importer.default_processor, importer.name
                    )
                })?,
        };

        Ok(EntryAction::Build {
            importer: importer.name.clone(),
            processor: processor.to_string(),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ImporterDescriptor;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn engine(config: serde_json::Value) -> SyncEngine {
        let config: Config = serde_json::from_value(config).unwrap();
        SyncEngine::new(&config).unwrap()
    }

    fn files(paths: &[&str]) -> Vec<NormalizedPath> {
        paths.iter().map(|p| NormalizedPath::new(p)).collect()
    }

    #[test]
    fn test_default_exclusions() {
        let engine = engine(json!({}));
        assert!(engine.is_excluded("bin/DesktopGL/Content/a.xnb"));
        assert!(engine.is_excluded("obj/a.png"));
        assert!(!engine.is_excluded("textures/bin.png"));
    }

    #[test]
    fn test_extension_lookup_and_default_processor() {
        let engine = engine(json!({}));
        let mut descriptor = Descriptor::parse("");
        let mut report = SyncReport::new("Content.mgcb");

        engine.sync(
            &mut descriptor,
            &files(&["textures/hero.png"]),
            &CapabilityRegistry::with_builtins(),
            &mut report,
        );

        assert_eq!(
            descriptor.lines(),
            &[
                "#begin textures/hero.png",
                "/importer:TextureImporter",
                "/processor:TextureProcessor",
                "/build:textures/hero.png",
                "",
            ]
        );
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_unknown_extension_is_diagnostic() {
        let engine = engine(json!({}));
        let mut descriptor = Descriptor::parse("");
        let mut report = SyncReport::new("Content.mgcb");

        engine.sync(
            &mut descriptor,
            &files(&["notes/readme", "data/level.xyz"]),
            &CapabilityRegistry::with_builtins(),
            &mut report,
        );

        assert!(descriptor.lines().is_empty());
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.diagnostics[1].subject.as_deref(), Some("data/level.xyz"));
    }

    #[test]
    fn test_unknown_override_importer_skips_file() {
        let engine = engine(json!({"overrides": {"*.png": {"importer": "Missing"}}}));
        let mut descriptor = Descriptor::parse("");
        let mut report = SyncReport::new("Content.mgcb");

        engine.sync(
            &mut descriptor,
            &files(&["a.png"]),
            &CapabilityRegistry::with_builtins(),
            &mut report,
        );

        assert!(report.added.is_empty());
        assert_eq!(
            report.diagnostics[0].message,
            "Override importer Missing not found for file a.png"
        );
    }

    #[test]
    fn test_unknown_override_processor_skips_file() {
        let engine = engine(json!({"overrides": {"*.png": {"processor": "Missing"}}}));
        let mut descriptor = Descriptor::parse("/platform:DesktopGL\n");
        let mut report = SyncReport::new("Content.mgcb");

        engine.sync(
            &mut descriptor,
            &files(&["a.png"]),
            &CapabilityRegistry::with_builtins(),
            &mut report,
        );

        assert!(report.added.is_empty());
        assert!(!descriptor.is_dirty());
        assert_eq!(descriptor.lines(), &["/platform:DesktopGL"]);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].subject.as_deref(), Some("a.png"));
        assert_eq!(
            report.diagnostics[0].message,
            "Override processor Missing not found for file a.png"
        );
    }

    #[test]
    fn test_unregistered_default_processor_skips_file() {
        let mut registry = CapabilityRegistry::new();
        registry.register_importer(ImporterDescriptor::new(
            "MapImporter",
            &[".tmx"],
            "MapProcessor",
        ));
        let engine = engine(json!({}));
        let mut descriptor = Descriptor::parse("");
        let mut report = SyncReport::new("Content.mgcb");

        engine.sync(&mut descriptor, &files(&["level.tmx"]), &registry, &mut report);

        assert!(report.added.is_empty());
        assert!(report.diagnostics[0].message.contains("MapProcessor"));
    }

    #[test]
    fn test_invalid_override_never_falls_back() {
        let engine = engine(json!({"overrides": {"*.png": ["TextureImporter"]}}));
        let mut descriptor = Descriptor::parse("");
        let mut report = SyncReport::new("Content.mgcb");

        engine.sync(
            &mut descriptor,
            &files(&["a.png"]),
            &CapabilityRegistry::with_builtins(),
            &mut report,
        );

        assert!(descriptor.lines().is_empty());
        assert!(report.diagnostics[0].message.starts_with("Invalid override *.png"));
    }
}
