use byteorder_slice::{BigEndian, LittleEndian};

use crate::errors::*;
use crate::pcap::{PcapHeader, PcapPacket};
use crate::Endianness;

/// Parses a Pcap from a slice of bytes.
///
/// You can match on [PcapError::IncompleteBuffer](crate::PcapError) to know if the parser needs more data.
///
/// # Examples
///
/// ```no_run
/// use pcap_tagger::pcap::PcapParser;
/// use pcap_tagger::PcapError;
///
/// let pcap = vec![0_u8; 0];
///
/// // Creates a new parser and parse the pcap header
/// let (mut src, pcap_parser) = PcapParser::new(&pcap[..]).unwrap();
///
/// while !src.is_empty() {
///     match pcap_parser.next_packet(src) {
///         Ok((rem, packet)) => {
///             // Do something
///
///             // Don't forget to update src
///             src = rem;
///         },
///         Err(PcapError::IncompleteBuffer(_needed)) => break, // Load more data into src
///         Err(_) => break, // Parsing error
///     }
/// }
/// ```
#[derive(Debug)]
pub struct PcapParser {
    header: PcapHeader,
}

impl PcapParser {
    /// Creates a new `PcapParser`.
    ///
    /// Returns the remainder and the parser.
    pub fn new(slice: &[u8]) -> PcapResult<(&[u8], PcapParser)> {
        let (slice, header) = PcapHeader::from_slice(slice)?;

        Ok((slice, PcapParser { header }))
    }

    /// Returns the remainder and the next packet.
    pub fn next_packet<'a>(&self, slice: &'a [u8]) -> PcapResult<(&'a [u8], PcapPacket<'a>)> {
        let ts_resolution = self.header.ts_resolution();

        match self.header.endianness() {
            Endianness::Big => PcapPacket::from_slice::<BigEndian>(slice, ts_resolution, self.header.snaplen),
            Endianness::Little => PcapPacket::from_slice::<LittleEndian>(slice, ts_resolution, self.header.snaplen),
        }
    }

    /// Returns the global header of the pcap.
    pub fn header(&self) -> PcapHeader {
        self.header
    }
}
