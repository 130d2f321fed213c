pub mod config;
pub mod file_map;
pub mod record;

pub use config::*;
pub use file_map::*;
pub use record::*;
