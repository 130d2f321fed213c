//! Parsers for model responses and for Python source.

mod response;
mod source;

pub use response::*;
pub use source::*;
