pub mod fix;
pub mod generate;
pub mod status;
pub mod tree;

pub use fix::*;
pub use generate::*;
pub use status::*;
pub use tree::*;
