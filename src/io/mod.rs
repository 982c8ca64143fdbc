//! IO abstractions: random-access sources and the per-object byte cursor.

mod byte_source;
mod reader;

pub use byte_source::{ByteSource, FileSource, MemorySource};
pub use reader::ByteReader;
