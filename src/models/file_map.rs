use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last operation applied to a project file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Written verbatim from a response
    Created,
    /// Merged into or overwritten from an edit response
    Edited,
    /// Repaired by the syntax fixer
    Fixed,
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Created => "CREATED",
            FileStatus::Edited => "EDITED",
            FileStatus::Fixed => "FIXED",
        }
    }
}

/// Persisted status for one project-relative path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapEntry {
    pub status: FileStatus,
}

impl FileMapEntry {
    pub fn new(status: FileStatus) -> Self {
        Self { status }
    }
}

/// Path to status mapping shared by every run over a project
///
/// Later records for the same path replace earlier ones. Entries are never
/// pruned, even when the file no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap {
    entries: BTreeMap<String, FileMapEntry>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest status for a path
    pub fn record(&mut self, path: impl Into<String>, status: FileStatus) {
        self.entries.insert(path.into(), FileMapEntry::new(status));
    }

    pub fn get(&self, path: &str) -> Option<&FileMapEntry> {
        self.entries.get(path)
    }

    pub fn status_of(&self, path: &str) -> Option<FileStatus> {
        self.entries.get(path).map(|e| e.status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileMapEntry)> {
        self.entries.iter()
    }

    /// Get summary counts
    pub fn summary(&self) -> FileMapSummary {
        let mut summary = FileMapSummary::default();
        for entry in self.entries.values() {
            match entry.status {
                FileStatus::Created => summary.created += 1,
                FileStatus::Edited => summary.edited += 1,
                FileStatus::Fixed => summary.fixed += 1,
            }
        }
        summary.total = self.entries.len();
        summary
    }
}

/// Summary of tracked file statuses
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FileMapSummary {
    pub total: usize,
    pub created: usize,
    pub edited: usize,
    pub fixed: usize,
}

impl std::fmt::Display for FileMapSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {} | Created: {} | Edited: {} | Fixed: {}",
            self.total, self.created, self.edited, self.fixed
        )
    }
}
