//! Outcome of synchronizing one descriptor

use serde::{Deserialize, Serialize};

/// Build action recorded for a newly added entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryAction {
    Copy,
    Build {
        importer: String,
        processor: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        params: Vec<(String, String)>,
    },
}

/// An entry block appended to the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedEntry {
    pub path: String,
    pub action: EntryAction,
}

/// Why a discovered file was left alone without a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Excluded,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// A reference line that was rewritten (`from` set) or inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceChange {
    pub library: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
}

/// A recoverable problem: the file or reference it names was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File path or library name the problem concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

/// Descriptor text before and after a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub before: String,
    pub after: String,
}

/// Report from a descriptor synchronization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Descriptor this report belongs to
    pub descriptor: String,
    /// Whether the descriptor content changed
    pub changed: bool,
    /// Whether the change was written to disk
    pub written: bool,
    pub added: Vec<AddedEntry>,
    pub references: Vec<ReferenceChange>,
    pub skipped: Vec<SkippedFile>,
    pub diagnostics: Vec<Diagnostic>,
    /// Pending change, only filled in on dry runs
    #[serde(skip)]
    pub preview: Option<Preview>,
}

impl SyncReport {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            ..Self::default()
        }
    }

    /// Record a recoverable problem and log it.
    pub fn warn(&mut self, subject: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.diagnostics.push(Diagnostic {
            subject: subject.map(str::to_string),
            message,
        });
    }

    pub fn skip(&mut self, path: &str, reason: SkipReason) {
        self.skipped.push(SkippedFile {
            path: path.to_string(),
            reason,
        });
    }

    /// Whether any file or reference produced a diagnostic.
    pub fn has_warnings(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
