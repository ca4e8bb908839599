//! Contains the Pcap parser, reader and writer, and the global and record header builders.

mod header;
mod packet;
mod parser;
mod reader;
mod writer;

pub use header::*;
pub use packet::*;
pub use parser::*;
pub use reader::*;
pub use writer::*;
