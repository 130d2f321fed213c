use std::path::Path;
use tracing::info;

use crate::core::{generate_code, generate_prompt, load_config, FileMapStore, MergeMode, ProjectWriter, WriteSummary};
use crate::error::AgentError;
use crate::models::ConfigOverrides;

/// Generate or edit project files for a task
///
/// Loads the file map, asks the model (or a mock) for files, applies them to
/// the generated project and saves the updated file map.
pub async fn generate_project(
    working_dir: &Path,
    task: &str,
    overrides: ConfigOverrides,
) -> Result<WriteSummary, AgentError> {
    let config = load_config(working_dir, overrides)?;
    let project_path = working_dir.join(config.paths.project_path());
    let store = FileMapStore::new(working_dir.join(&config.paths.file_map));
    let mut file_map = store.load()?;

    let prompt = generate_prompt(task, &file_map);
    let records = generate_code(&prompt, task, &config).await;
    info!("Model response contained {} file(s)", records.len());

    let mut writer = ProjectWriter::new(&project_path)?;
    let summary = writer.write_all(&records, &mut file_map)?;
    store.save(&file_map)?;

    for written in &summary.written {
        let detail = match &written.merge {
            Some(MergeMode::Merged { added }) => format!(" (added {})", added.join(", ")),
            Some(MergeMode::Replaced) => " (replaced)".to_string(),
            Some(MergeMode::Overwrite) => " (overwritten)".to_string(),
            None => String::new(),
        };
        println!("  {} [{}]{}", written.path, written.status.label(), detail);
    }
    for skipped in &summary.skipped {
        println!("  {} [SKIPPED]", skipped);
    }
    println!("Task completed in {}", project_path.display());

    Ok(summary)
}
