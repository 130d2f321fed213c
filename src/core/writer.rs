use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::merge::{merge, MergeMode};
use crate::core::parser::SourceParser;
use crate::error::{AgentError, Result};
use crate::models::{FileMap, FileRecord, FileStatus};

/// One record applied to the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: String,
    pub status: FileStatus,
    /// Set when an existing file was edited
    pub merge: Option<MergeMode>,
}

/// Summary of a write batch
#[derive(Debug, Default)]
pub struct WriteSummary {
    pub written: Vec<WrittenFile>,
    /// Record paths rejected for leaving the project root
    pub skipped: Vec<String>,
}

/// Applies file records to a project directory
///
/// Single writer: one `ProjectWriter` per project directory at a time.
/// Writes are not transactional, a failure leaves earlier files of the
/// batch written and the file map partially updated.
pub struct ProjectWriter {
    project_root: PathBuf,
    parser: SourceParser,
}

impl ProjectWriter {
    pub fn new(project_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            project_root: project_root.into(),
            parser: SourceParser::new()?,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Write every record in order, recording its status in `file_map`
    pub fn write_all(&mut self, records: &[FileRecord], file_map: &mut FileMap) -> Result<WriteSummary> {
        fs::create_dir_all(&self.project_root)?;
        let mut summary = WriteSummary::default();

        for record in records {
            if !is_contained(&record.path) {
                warn!("Skipping {}: path leaves the project directory", record.path);
                summary.skipped.push(record.path.clone());
                continue;
            }

            let written = self.write_record(record)?;
            file_map.record(record.path.clone(), written.status);
            summary.written.push(written);
        }

        info!(
            "Wrote {} file(s) to {}",
            summary.written.len(),
            self.project_root.display()
        );
        Ok(summary)
    }

    fn write_record(&mut self, record: &FileRecord) -> Result<WrittenFile> {
        let target = self.project_root.join(&record.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if target.exists() && record.is_edit() {
            let existing = fs::read_to_string(&target)?;
            let result = merge(&mut self.parser, &existing, &record.code);
            write_file(&target, &result.content)?;
            debug!("Edited {} ({:?})", record.path, result.mode);
            return Ok(WrittenFile {
                path: record.path.clone(),
                status: FileStatus::Edited,
                merge: Some(result.mode),
            });
        }

        write_file(&target, &record.code)?;
        debug!("Created {}", record.path);
        Ok(WrittenFile {
            path: record.path.clone(),
            status: FileStatus::Created,
            merge: None,
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| AgentError::WriteFailed(path.to_path_buf(), e))
}

/// A relative path with no `..` segments stays inside the root it is joined to.
/// It must also name something below the root, so `.` alone is rejected.
fn is_contained(path: &str) -> bool {
    let path = Path::new(path);
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}
