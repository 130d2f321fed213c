pub mod codegen;
pub mod config;
pub mod file_map;
pub mod merge;
pub mod ollama;
pub mod parser;
pub mod prompts;
pub mod repair;
pub mod tree;
pub mod writer;

pub use codegen::*;
pub use config::*;
pub use file_map::*;
pub use merge::*;
pub use ollama::*;
pub use parser::*;
pub use prompts::*;
pub use repair::*;
pub use tree::*;
pub use writer::*;
