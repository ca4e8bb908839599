//! The synthetic Ethernet header that tags each captured frame with the application it belongs to.

use std::io::Write;

use byteorder_slice::{BigEndian, ByteOrder};
use log::trace;

use crate::errors::BuildError;

/// Size of the synthetic link-layer header in bytes.
pub const LINK_HEADER_LEN: usize = 14;

/// Destination address written in every synthetic header.
pub const SYNTHETIC_DESTINATION: [u8; 6] = [0x00, 0xe0, 0x81, 0xd7, 0xb5, 0xa6];

/// EtherType of IPv4.
pub const ETHERTYPE_IPV4: u16 = 0x0800;

/// EtherType of IPv6.
pub const ETHERTYPE_IPV6: u16 = 0x86dd;

//   0                   6                   10        12        14
//  +-------------------+-------------------+---------+---------+
//  |  00 E0 81 D7 B5 A6 | identifier (BE)   |  00 00  |  08 00  |
//  +-------------------+-------------------+---------+---------+
/// Synthetic Ethernet header whose source address carries an application identifier.
///
/// The identifier is written big endian, unlike the little endian pcap headers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SyntheticLinkHeader {
    /// Identifier of the application the frame belongs to
    pub identifier: u32,
}

impl SyntheticLinkHeader {
    /// Creates the header for the application `identifier`.
    pub fn new(identifier: u32) -> Self {
        SyntheticLinkHeader { identifier }
    }

    /// Encodes the header.
    pub fn to_bytes(&self) -> [u8; LINK_HEADER_LEN] {
        let mut buf = [0_u8; LINK_HEADER_LEN];

        buf[0..6].copy_from_slice(&SYNTHETIC_DESTINATION);
        BigEndian::write_u32(&mut buf[6..10], self.identifier);
        BigEndian::write_u16(&mut buf[12..14], ETHERTYPE_IPV4);

        buf
    }

    /// Write the header to a writer.
    ///
    /// Writes 14B in the writer on success.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Reads the identifier back from the source address of an Ethernet header.
    pub fn identifier_from_source(source: &[u8; 6]) -> u32 {
        BigEndian::read_u32(&source[0..4])
    }
}

/// Returns the 14-byte synthetic link-layer header for the application `identifier`.
///
/// Negative identifiers down to `i32::MIN` are written as their 32-bit two's complement,
/// so `-1` becomes `FF FF FF FF`.
///
/// # Errors
///
/// `BuildError::InvalidIdentifier` if `identifier` is outside `i32::MIN..=u32::MAX`. It is never truncated.
pub fn build_link_layer_header(identifier: i64) -> Result<[u8; LINK_HEADER_LEN], BuildError> {
    trace!("build_link_layer_header({})", identifier);

    let identifier = match (u32::try_from(identifier), i32::try_from(identifier)) {
        (Ok(unsigned), _) => unsigned,
        (Err(_), Ok(signed)) => signed as u32,
        (Err(_), Err(_)) => return Err(BuildError::InvalidIdentifier(identifier)),
    };

    Ok(SyntheticLinkHeader::new(identifier).to_bytes())
}
