use std::fs;
use std::path::Path;

use crate::core::{load_config, repair_file, FileMapStore, RepairOutcome, SourceParser};
use crate::error::AgentError;
use crate::models::{ConfigOverrides, FileStatus};

/// Repair simple syntax errors in a project file
///
/// `file` is relative to the generated project. A fixed file is written back
/// and recorded as `fixed` in the file map. "No errors" and "could not fix"
/// are reported, not treated as failures.
pub fn fix_file(
    working_dir: &Path,
    file: &str,
    overrides: ConfigOverrides,
) -> Result<RepairOutcome, AgentError> {
    let config = load_config(working_dir, overrides)?;
    let full_path = working_dir.join(config.paths.project_path()).join(file);

    if !full_path.exists() {
        return Err(AgentError::FileNotFound(full_path));
    }

    let mut parser = SourceParser::new()?;
    let outcome = repair_file(&mut parser, &full_path)?;

    match &outcome {
        RepairOutcome::NoErrors => {
            println!("No syntax errors found in {}", file);
        }
        RepairOutcome::Fixed(fixed) => {
            fs::write(&full_path, fixed)
                .map_err(|e| AgentError::WriteFailed(full_path.clone(), e))?;

            let store = FileMapStore::new(working_dir.join(&config.paths.file_map));
            let mut file_map = store.load()?;
            file_map.record(file, FileStatus::Fixed);
            store.save(&file_map)?;

            println!("Fixed syntax errors in {}", file);
        }
        RepairOutcome::CannotFix { line, message } => {
            println!("Could not fix {} (line {}: {})", file, line, message);
        }
    }

    Ok(outcome)
}
