//! Best-effort repair of simple syntax errors.
//!
//! Two rules are supported: an unexpected indent loses its leading
//! whitespace, and a block header missing its colon gets one appended. Only
//! the reported line is touched and only one attempt is made.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::core::parser::{SourceParser, SyntaxError, SyntaxErrorKind};
use crate::error::{AgentError, Result};

/// Outcome of a repair attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Source already parses
    NoErrors,
    /// Repaired source, parses cleanly
    Fixed(String),
    /// No rule applied, or the rule did not produce valid source
    CannotFix { line: usize, message: String },
}

/// Try to repair the source of a file without writing it back
pub fn repair_file(parser: &mut SourceParser, path: &Path) -> Result<RepairOutcome> {
    if !path.exists() {
        return Err(AgentError::FileNotFound(path.to_path_buf()));
    }
    let source = fs::read_to_string(path)?;
    Ok(repair_source(parser, &source))
}

/// Try to repair source text
pub fn repair_source(parser: &mut SourceParser, source: &str) -> RepairOutcome {
    let error = match parser.parse(source) {
        Ok(_) => return RepairOutcome::NoErrors,
        Err(e) => e,
    };
    debug!("Syntax error found: {}", error);

    let cannot_fix = |error: &SyntaxError| RepairOutcome::CannotFix {
        line: error.line,
        message: error.message(),
    };

    let Some(fixed) = apply_rule(source, &error) else {
        debug!("No repair rule for: {}", error.kind);
        return cannot_fix(&error);
    };

    match parser.parse(&fixed) {
        Ok(_) => {
            info!("Repaired line {}: {}", error.line, error.kind);
            RepairOutcome::Fixed(fixed)
        }
        Err(remaining) => {
            debug!("Source still invalid after repair: {}", remaining);
            cannot_fix(&error)
        }
    }
}

/// Apply the rule matching the error to its line
fn apply_rule(source: &str, error: &SyntaxError) -> Option<String> {
    let mut lines: Vec<String> = source.split('\n').map(str::to_string).collect();
    let target = lines.get_mut(error.line.checked_sub(1)?)?;

    match error.kind {
        SyntaxErrorKind::UnexpectedIndent => {
            *target = target.trim_start().to_string();
        }
        SyntaxErrorKind::ExpectedColon => {
            let trimmed = target.trim_end().to_string();
            *target = format!("{}:", trimmed);
        }
        _ => return None,
    }

    Some(lines.join("\n"))
}
