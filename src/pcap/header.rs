//! This module contains the `PcapHeader` struct which represents a global pcap header.

use std::io::Write;

use byteorder_slice::{BigEndian, ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::errors::*;
use crate::{DataLink, Endianness, TsResolution};

/// Size of the global header in bytes.
pub const GLOBAL_HEADER_LEN: usize = 24;

/// Pcap Global Header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PcapHeader {
    /// Magic number, stored as read in BigEndian
    pub magic_number: u32,

    /// Major version number
    pub version_major: u16,

    /// Minor version number
    pub version_minor: u16,

    /// GMT to local timezone correction, should always be 0
    pub ts_correction: i32,

    /// Timestamp accuracy, should always be 0
    pub ts_accuracy: u32,

    /// Max length of captured packet, typically 65535
    pub snaplen: u32,

    /// DataLink type (first layer in the packet)
    pub datalink: DataLink,
}

impl PcapHeader {
    /// Creates a new `PcapHeader` from a slice of bytes.
    ///
    /// Returns the remainder of the slice and the header.
    ///
    /// `PcapError::IncompleteBuffer` indicates that there is not enough data in the buffer.
    pub fn from_slice(slice: &[u8]) -> PcapResult<(&[u8], PcapHeader)> {
        if slice.len() < GLOBAL_HEADER_LEN {
            return Err(PcapError::IncompleteBuffer(GLOBAL_HEADER_LEN - slice.len()));
        }

        let magic_number = BigEndian::read_u32(&slice[0..4]);

        let header = match magic_number {
            0xa1b2c3d4 | 0xa1b23c4d => init_pcap_header::<BigEndian>(slice, magic_number),
            0xd4c3b2a1 | 0x4d3cb2a1 => init_pcap_header::<LittleEndian>(slice, magic_number),
            _ => return Err(PcapError::InvalidField("PcapHeader: wrong magic number")),
        };

        debug!(
            "Pcap header version {}.{}, {:?} endian, snaplen {}, datalink {:?}",
            header.version_major,
            header.version_minor,
            header.endianness(),
            header.snaplen,
            header.datalink
        );

        return Ok((&slice[GLOBAL_HEADER_LEN..], header));

        // Inner function used for the initialisation of the `PcapHeader`
        fn init_pcap_header<B: ByteOrder>(slice: &[u8], magic_number: u32) -> PcapHeader {
            PcapHeader {
                magic_number,
                version_major: B::read_u16(&slice[4..6]),
                version_minor: B::read_u16(&slice[6..8]),
                ts_correction: B::read_i32(&slice[8..12]),
                ts_accuracy: B::read_u32(&slice[12..16]),
                snaplen: B::read_u32(&slice[16..20]),
                datalink: DataLink::from(B::read_u32(&slice[20..24])),
            }
        }
    }

    /// Encodes the header in the endianness given by its magic number.
    pub fn to_bytes(&self) -> [u8; GLOBAL_HEADER_LEN] {
        match self.endianness() {
            Endianness::Big => self.encode::<BigEndian>(),
            Endianness::Little => self.encode::<LittleEndian>(),
        }
    }

    fn encode<B: ByteOrder>(&self) -> [u8; GLOBAL_HEADER_LEN] {
        let mut buf = [0_u8; GLOBAL_HEADER_LEN];

        // The magic number is always read in BigEndian so it's always written in BigEndian too
        BigEndian::write_u32(&mut buf[0..4], self.magic_number);
        B::write_u16(&mut buf[4..6], self.version_major);
        B::write_u16(&mut buf[6..8], self.version_minor);
        B::write_i32(&mut buf[8..12], self.ts_correction);
        B::write_u32(&mut buf[12..16], self.ts_accuracy);
        B::write_u32(&mut buf[16..20], self.snaplen);
        B::write_u32(&mut buf[20..24], self.datalink.into());

        buf
    }

    /// Write a `PcapHeader` to a writer.
    ///
    /// Writes 24B in the writer on success.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> PcapResult<usize> {
        writer.write_all(&self.to_bytes())?;
        Ok(GLOBAL_HEADER_LEN)
    }

    /// Return the endianness of the pcap
    ///
    /// # Panics
    ///
    /// Panics if the magic number is invalid
    pub fn endianness(&self) -> Endianness {
        match self.magic_number {
            0xa1b2c3d4 | 0xa1b23c4d => Endianness::Big,
            0xd4c3b2a1 | 0x4d3cb2a1 => Endianness::Little,
            _ => unreachable!("Wrong magic number, can't get the header's endianness"),
        }
    }

    /// Return the timestamp resolution of the pcap
    ///
    /// # Panics
    ///
    /// Panics if the magic number is invalid
    pub fn ts_resolution(&self) -> TsResolution {
        match self.magic_number {
            0xa1b2c3d4 | 0xd4c3b2a1 => TsResolution::MicroSecond,
            0xa1b23c4d | 0x4d3cb2a1 => TsResolution::NanoSecond,
            _ => unreachable!("Wrong magic number, can't get the header's timestamp resolution"),
        }
    }
}

/// Creates a new `PcapHeader` with the parameters of every capture this crate produces:
///
/// ```rust,ignore
/// PcapHeader {
///     magic_number : 0xd4c3b2a1, // little endian, microseconds
///     version_major : 2,
///     version_minor : 4,
///     ts_correction : 0,
///     ts_accuracy : 0,
///     snaplen : 65535,
///     datalink : DataLink::ETHERNET
/// };
/// ```
impl Default for PcapHeader {
    fn default() -> Self {
        PcapHeader {
            magic_number: 0xd4c3b2a1,
            version_major: 2,
            version_minor: 4,
            ts_correction: 0,
            ts_accuracy: 0,
            snaplen: 65535,
            datalink: DataLink::ETHERNET,
        }
    }
}

/// Returns the 24 bytes of the global header that starts every capture built by this crate.
///
/// The output never varies: `D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00 FF FF 00 00 01 00 00 00`.
pub fn build_global_header() -> [u8; GLOBAL_HEADER_LEN] {
    trace!("build_global_header()");
    PcapHeader::default().to_bytes()
}
