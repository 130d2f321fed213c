//! codeagent - applies code-generation responses to a project tree
//!
//! A model (or a bundled mock) answers a task with `FILE:` sections. Those
//! sections are parsed into file records and written under the generated
//! project. Edits to existing Python files merge in new top-level functions
//! only. A separate fixer repairs two simple classes of syntax errors.
//!
//! # Architecture
//!
//! - **commands**: CLI command implementations (generate, fix, tree, status)
//! - **core**: Response and source parsing, merge, repair, writer, file map, model client
//! - **models**: Data structures (config, file records, file map)
//! - **templates**: Bundled mock responses
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;
pub mod templates;

pub use error::{AgentError, Result};
