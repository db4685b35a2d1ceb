//! Capability registry storage

use super::ImporterDescriptor;

/// Importers and processors available to one run.
///
/// Registration order is kept: when two importers claim the same
/// extension, the one registered first wins. Re-registering a name is
/// ignored so the first definition stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    importers: Vec<ImporterDescriptor>,
    processors: Vec<String>,
}

impl CapabilityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the stock pipeline capabilities.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for importer in super::builtin_importers() {
            registry.register_importer(importer);
        }
        for processor in super::builtin_processors() {
            registry.register_processor(processor);
        }
        registry
    }

    /// Register an importer. Returns `false` if the name was already taken.
    pub fn register_importer(&mut self, importer: ImporterDescriptor) -> bool {
        if self.importer_by_name(&importer.name).is_some() {
            tracing::debug!(importer = %importer.name, "importer already registered, keeping first");
            return false;
        }
        self.importers.push(importer);
        true
    }

    /// Register a processor. Returns `false` if the name was already taken.
    pub fn register_processor(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.processor_by_name(&name).is_some() {
            return false;
        }
        self.processors.push(name);
        true
    }

    /// Look up an importer by exact name.
    pub fn importer_by_name(&self, name: &str) -> Option<&ImporterDescriptor> {
        self.importers.iter().find(|i| i.name == name)
    }

    /// Look up a processor by exact name.
    pub fn processor_by_name(&self, name: &str) -> Option<&str> {
        self.processors
            .iter()
            .find(|p| *p == name)
            .map(String::as_str)
    }

    /// First registered importer handling `extension`.
    pub fn importer_for_extension(&self, extension: &str) -> Option<&ImporterDescriptor> {
        self.importers.iter().find(|i| i.handles(extension))
    }

    /// All importers in registration order.
    pub fn importers(&self) -> &[ImporterDescriptor] {
        &self.importers
    }

    /// All processors in registration order.
    pub fn processors(&self) -> &[String] {
        &self.processors
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.importers.is_empty() && self.processors.is_empty()
    }
}
