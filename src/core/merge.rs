//! Function-level merge of incoming code into an existing file.

use tracing::{debug, info};

use crate::core::parser::SourceParser;

/// How the merged content was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeMode {
    /// New functions were appended to the existing file
    Merged { added: Vec<String> },
    /// Incoming code defines no new function and replaces the file
    Replaced,
    /// One side failed to parse and incoming code replaces the file
    Overwrite,
}

/// Result of merging incoming code into existing content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub content: String,
    pub mode: MergeMode,
}

impl MergeResult {
    /// True only when the parse-failure fallback was taken
    pub fn used_overwrite(&self) -> bool {
        self.mode == MergeMode::Overwrite
    }
}

/// Merge `incoming` into `existing` at the top-level function level
///
/// Only synchronous functions whose name is absent from `existing` are
/// taken from `incoming`, appended in incoming order. `async def` and class
/// definitions are never merged. Existing definitions are never
/// removed or rewritten. When either side fails to parse, or when there is
/// nothing new to add, the incoming code replaces the file.
pub fn merge(parser: &mut SourceParser, existing: &str, incoming: &str) -> MergeResult {
    let overwrite = || MergeResult {
        content: incoming.to_string(),
        mode: MergeMode::Overwrite,
    };

    let mut existing_tree = match parser.parse(existing) {
        Ok(tree) => tree,
        Err(e) => {
            debug!("Existing content does not parse ({}), overwriting", e);
            return overwrite();
        }
    };
    let incoming_tree = match parser.parse(incoming) {
        Ok(tree) => tree,
        Err(e) => {
            debug!("Incoming code does not parse ({}), overwriting", e);
            return overwrite();
        }
    };

    let existing_names = existing_tree.function_names();
    let new_functions: Vec<(String, String)> = incoming_tree
        .functions()
        .filter_map(|s| {
            let name = s.function_name()?;
            (!existing_names.contains(name))
                .then(|| (name.to_string(), incoming_tree.text_of(s).to_string()))
        })
        .collect();

    if new_functions.is_empty() {
        debug!("No new functions in incoming code, replacing content");
        return MergeResult {
            content: incoming.to_string(),
            mode: MergeMode::Replaced,
        };
    }

    let mut added = Vec::with_capacity(new_functions.len());
    for (name, text) in new_functions {
        existing_tree.append(text);
        added.push(name);
    }
    info!("Merged {} new function(s): {}", added.len(), added.join(", "));

    MergeResult {
        content: existing_tree.to_source(),
        mode: MergeMode::Merged { added },
    }
}
