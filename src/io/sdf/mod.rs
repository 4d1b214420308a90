//! V2000 MDL molfile / SD file blocks.

mod reader;
mod writer;

pub use reader::read;
pub use writer::write;
