//! Small types shared by the reader, the writer and the layer decoder.

/// Endianness of a pcap stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endianness {
    /// Big endian
    Big,
    /// Little endian
    Little,
}

/// Timestamp resolution of a pcap stream, selected by its magic number.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TsResolution {
    /// Microsecond resolution
    MicroSecond,
    /// Nanosecond resolution
    NanoSecond,
}

/// Link type of the packets in a capture (the `network` field of the global header).
///
/// Only the link types the layer decoder understands get their own variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DataLink {
    /// IEEE 802.3 Ethernet
    ETHERNET,
    /// Raw IPv4 or IPv6, no link-layer header
    RAW,
    /// Any other link type
    Unknown(u32),
}

impl From<u32> for DataLink {
    fn from(n: u32) -> DataLink {
        match n {
            1 => DataLink::ETHERNET,
            101 => DataLink::RAW,
            _ => DataLink::Unknown(n),
        }
    }
}

impl From<DataLink> for u32 {
    fn from(link: DataLink) -> u32 {
        match link {
            DataLink::ETHERNET => 1,
            DataLink::RAW => 101,
            DataLink::Unknown(n) => n,
        }
    }
}
