//! Turns a model response into file records.

use regex::Regex;
use tracing::debug;

use crate::models::{FileRecord, TaskKind};

const FILE_MARKER: &str = "FILE:";
const FENCE: &str = "```";

/// Words that mark a whole response as an edit
const EDIT_KEYWORDS: &str = r"(?i)add|edit|update|modify|fix";

/// Classify a response as create or edit
///
/// The scan covers the whole response text, so every record parsed from one
/// response shares the same classification.
pub fn classify_response(response: &str) -> TaskKind {
    let re = Regex::new(EDIT_KEYWORDS).unwrap();
    if re.is_match(response) {
        TaskKind::Edit
    } else {
        TaskKind::Create
    }
}

/// Parse `FILE:` sections out of a model response
///
/// Single forward pass over the lines:
/// - `FILE: <path>` starts a new file, flushing the pending one
/// - a line starting with a triple backtick toggles the fence and is dropped
/// - other lines are kept when inside a fence, or when they are not blank
///
/// A file is only emitted when it has a non-empty path and at least one
/// buffered line. Malformed input never fails, it just yields fewer or
/// partial records.
pub fn parse_response(response: &str) -> Vec<FileRecord> {
    let task = classify_response(response);
    let mut files = Vec::new();
    let mut current_path: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in response.lines() {
        if let Some(rest) = line.strip_prefix(FILE_MARKER) {
            flush(&mut files, current_path.take(), &buffer, task);
            current_path = Some(rest.trim().to_string());
            buffer.clear();
            in_fence = false;
        } else if line.trim().starts_with(FENCE) {
            in_fence = !in_fence;
        } else if in_fence || !line.trim().is_empty() {
            buffer.push(line);
        }
    }

    flush(&mut files, current_path, &buffer, task);

    debug!("Parsed {} file(s) from response ({})", files.len(), task);
    files
}

fn flush(files: &mut Vec<FileRecord>, path: Option<String>, buffer: &[&str], task: TaskKind) {
    let Some(path) = path else {
        return;
    };
    if path.trim().is_empty() || buffer.is_empty() {
        return;
    }

    let code = buffer.join("\n").trim().to_string();
    debug!("Extracted file: {} ({} lines)", path.trim(), buffer.len());
    files.push(FileRecord::new(path.trim(), code, task));
}
