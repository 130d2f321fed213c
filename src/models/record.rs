use serde::{Deserialize, Serialize};

/// How a parsed file should be applied to the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Write the file verbatim
    Create,
    /// Merge into the existing file when there is one
    Edit,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Create => "create",
            TaskKind::Edit => "edit",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file described by a generation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root, not yet validated
    pub path: String,
    /// Complete file content, trimmed
    pub code: String,
    /// Classification shared by every record of the same response
    pub task: TaskKind,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, code: impl Into<String>, task: TaskKind) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
            task,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.task == TaskKind::Edit
    }
}
