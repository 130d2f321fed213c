//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a working directory with a config pointing at local paths
pub fn create_test_workspace() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let working_dir = temp_dir.path().to_path_buf();

    fs::write(
        working_dir.join("codeagent.toml"),
        r#"
[model]
use_mock = true

[paths]
projects_dir = "projects"
project_name = "generated_project"
file_map = "memory/file_map.json"

[behavior]
stream_output = false
"#,
    )
    .expect("Failed to write config");

    (temp_dir, working_dir)
}

/// Root of the generated project inside a workspace
pub fn project_path(working_dir: &Path) -> PathBuf {
    working_dir.join("projects").join("generated_project")
}

/// Path of the file map inside a workspace
pub fn file_map_path(working_dir: &Path) -> PathBuf {
    working_dir.join("memory").join("file_map.json")
}

/// Write a file inside the generated project
pub fn create_project_file(working_dir: &Path, path: &str, content: &str) {
    let full_path = project_path(working_dir).join(path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create project file parent dir");
    }
    fs::write(full_path, content).expect("Failed to write project file");
}

/// Read a file inside the generated project
pub fn read_project_file(working_dir: &Path, path: &str) -> String {
    fs::read_to_string(project_path(working_dir).join(path)).expect("Failed to read project file")
}
