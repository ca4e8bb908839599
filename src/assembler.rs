//! Turns a raw dump of already framed records into a complete capture file.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::errors::*;
use crate::pcap::build_global_header;

/// Writes `build_global_header() ++ raw_bytes` to `writer`.
///
/// `raw_bytes` is written as is: it must already be a sequence of records.
pub fn assemble_to<W: Write>(raw_bytes: &[u8], writer: &mut W) -> PcapResult<()> {
    writer.write_all(&build_global_header())?;
    writer.write_all(raw_bytes)?;
    Ok(())
}

/// Writes `build_global_header() ++ raw_bytes` as the whole content of `destination`.
///
/// The file is created if needed and truncated otherwise.
///
/// # Examples
///
/// ```rust,no_run
/// use pcap_tagger::assemble;
///
/// // Records streamed by the capture pipeline, without a global header
/// let raw = std::fs::read("chrome.raw").unwrap();
/// assemble(&raw, "chrome.pcap").unwrap();
/// ```
pub fn assemble<P: AsRef<Path>>(raw_bytes: &[u8], destination: P) -> PcapResult<()> {
    let destination = destination.as_ref();

    let mut file = File::create(destination)?;
    assemble_to(raw_bytes, &mut file)?;
    file.flush()?;

    debug!("Assembled {} ({} bytes of records)", destination.display(), raw_bytes.len());

    Ok(())
}

/// Reads the raw records from `source` and assembles them into `destination`.
pub fn assemble_from_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> PcapResult<()> {
    let raw_bytes = fs::read(source)?;
    assemble(&raw_bytes, destination)
}
