//! Renders the TCP records of a capture as text.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::debug;

use crate::decoder::{DecodedRecord, Layer, LayerKind};
use crate::errors::*;
use crate::pcap::PcapReader;

/// Text rendering of one decoded record.
///
/// Records without a TCP layer render as the empty string.
pub struct Fragment<'a>(pub &'a DecodedRecord);

impl fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        let tcp = match record.tcp() {
            Some(tcp) => tcp,
            None => return Ok(()),
        };

        writeln!(f, "Arrival time: {}", record.arrival_micros())?;
        writeln!(f, "Protocol: {}", record.protocol())?;
        writeln!(f, "Destination port: {}", tcp.destination_port)?;
        writeln!(f, "Header length: {}", tcp.header_len)?;
        writeln!(f, "Source port: {}", tcp.source_port)?;
        writeln!(f, "Ack number: {}", tcp.acknowledgment_number)?;
        writeln!(f, "Name: {}", tcp.name())?;
        writeln!(f, "Sequence number: {}", tcp.sequence_number)?;

        // Arrival time and protocol of the network layer, run together
        match record.beneath(LayerKind::Tcp) {
            Some(layer @ (Layer::Ipv4(_) | Layer::Ipv6(_))) => write!(f, "{}{}", record.arrival_micros(), layer.kind()),
            _ => Ok(()),
        }
    }
}

/// Returns the text rendering of `record`.
pub fn render_fragment(record: &DecodedRecord) -> String {
    Fragment(record).to_string()
}

/// Decodes the capture at `source` and writes the text of its records to `destination`.
///
/// The destination is created empty once the capture header is read, then rewritten after
/// every record with that record's text only: when this returns, it holds the text of the
/// last record.
///
/// # Errors
///
/// `DecodeError::UnreadableOrMalformed` if the capture can't be opened or parsed. When the
/// failure is in the global header the destination is left untouched.
/// `DecodeError::WriteFailed` if the destination can't be written.
pub fn dump_to_text<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<(), DecodeError> {
    let (source, destination) = (source.as_ref(), destination.as_ref());

    let file = File::open(source).map_err(PcapError::from)?;
    let mut reader = PcapReader::new(file)?;
    let datalink = reader.header().datalink;

    fs::write(destination, "").map_err(DecodeError::WriteFailed)?;

    let mut nb_records = 0_usize;
    let mut nb_tcp = 0_usize;
    while let Some(packet) = reader.next_packet() {
        let record = DecodedRecord::decode(&packet?, datalink);
        if record.has_layer(LayerKind::Tcp) {
            nb_tcp += 1;
        }

        fs::write(destination, render_fragment(&record)).map_err(DecodeError::WriteFailed)?;
        nb_records += 1;
    }

    debug!("Dumped {} records ({} with TCP) from {} to {}", nb_records, nb_tcp, source.display(), destination.display());

    Ok(())
}

/// Path of the text dump for the capture at `capture`: same path with a `txt` extension.
pub fn dump_path_for<P: AsRef<Path>>(capture: P) -> PathBuf {
    capture.as_ref().with_extension("txt")
}

/// Dumps the capture at `capture` next to it (see [`dump_path_for`]) and returns the text path.
pub fn dump_beside<P: AsRef<Path>>(capture: P) -> Result<PathBuf, DecodeError> {
    let destination = dump_path_for(&capture);
    dump_to_text(capture, &destination)?;
    Ok(destination)
}
