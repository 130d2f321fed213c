use std::path::Path;

use crate::core::{build_file_tree, load_config, render_tree};
use crate::error::AgentError;
use crate::models::ConfigOverrides;

/// Print the generated project's file tree
pub fn show_tree(working_dir: &Path, overrides: ConfigOverrides, json: bool) -> Result<(), AgentError> {
    let config = load_config(working_dir, overrides)?;
    let tree = build_file_tree(&working_dir.join(config.paths.project_path()));

    if json {
        let output = serde_json::to_string_pretty(&tree)
            .map_err(|e| AgentError::Io(std::io::Error::other(e)))?;
        println!("{}", output);
    } else if tree.is_empty() {
        println!("Project is empty.");
    } else {
        println!("Project file tree:");
        print!("{}", render_tree(&tree));
    }

    Ok(())
}
