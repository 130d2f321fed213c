use std::path::Path;

use crate::core::{load_config, FileMapStore};
use crate::error::AgentError;
use crate::models::ConfigOverrides;

/// Show tracked files and their last status
pub fn show_status(working_dir: &Path, overrides: ConfigOverrides, verbose: bool) -> Result<(), AgentError> {
    let config = load_config(working_dir, overrides)?;
    let store = FileMapStore::new(working_dir.join(&config.paths.file_map));
    let file_map = store.load()?;

    println!("=== codeagent Status ===\n");
    println!("{}", file_map.summary());

    if verbose {
        println!();
        if file_map.is_empty() {
            println!("No files tracked.");
        } else {
            println!("Files:");
            for (path, entry) in file_map.iter() {
                println!("  {} [{}]", path, entry.status.label());
            }
        }
    }

    Ok(())
}
