use std::borrow::Cow;
use std::io::Write;
use std::time::Duration;

use byteorder_slice::byteorder::WriteBytesExt;
use byteorder_slice::{ByteOrder, LittleEndian};
use derive_into_owned::IntoOwned;
use log::trace;

use crate::errors::*;
use crate::link_layer::LINK_HEADER_LEN;
use crate::TsResolution;

/// Size of a record header in bytes.
pub const RECORD_HEADER_LEN: usize = 16;

/// Seconds written in every synthetic record header (octets `FB 15 F5 55`).
pub const SENTINEL_TS_SEC: u32 = 0x55F5_15FB;

/// Microseconds written in every synthetic record header (octets `98 6A 0B 00`).
pub const SENTINEL_TS_USEC: u32 = 0x000B_6A98;

/// Pcap packet with its header and data.
///
/// The payload can be owned or borrowed.
#[derive(Clone, Debug, IntoOwned)]
pub struct PcapPacket<'a> {
    /// Timestamp EPOCH of the packet with a nanosecond resolution
    pub timestamp: Duration,
    /// Original length of the packet when captured on the wire
    pub orig_len: u32,
    /// Payload, owned or borrowed, of the packet
    pub data: Cow<'a, [u8]>,
}

impl<'a> PcapPacket<'a> {
    /// Create a new borrowed `PcapPacket` with the given parameters.
    pub fn new(timestamp: Duration, orig_len: u32, data: &'a [u8]) -> PcapPacket<'a> {
        PcapPacket { timestamp, orig_len, data: Cow::Borrowed(data) }
    }

    /// Create a new owned `PcapPacket` with the given parameters.
    pub fn new_owned(timestamp: Duration, orig_len: u32, data: Vec<u8>) -> PcapPacket<'static> {
        PcapPacket { timestamp, orig_len, data: Cow::Owned(data) }
    }

    /// Parse a new borrowed `PcapPacket` from a slice.
    pub fn from_slice<B: ByteOrder>(slice: &'a [u8], ts_resolution: TsResolution, snap_len: u32) -> PcapResult<(&'a [u8], PcapPacket<'a>)> {
        let (slice, header) = PacketHeader::from_slice::<B>(slice, snap_len)?;
        let len = header.incl_len as usize;

        if slice.len() < len {
            return Err(PcapError::IncompleteBuffer(len - slice.len()));
        }

        let packet = PcapPacket {
            timestamp: header.timestamp(ts_resolution)?,
            orig_len: header.orig_len,
            data: Cow::Borrowed(&slice[..len]),
        };

        Ok((&slice[len..], packet))
    }
}

/// Pcap record header
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct PacketHeader {
    /// Timestamp in seconds
    pub ts_sec: u32,
    /// Fractional part of the timestamp, in the unit of the capture's `TsResolution`
    pub ts_frac: u32,
    /// Number of octets of the packet saved in file
    pub incl_len: u32,
    /// Original length of the packet on the wire
    pub orig_len: u32,
}

impl PacketHeader {
    /// Creates the header of a synthetic frame carrying `payload_len` bytes after its link-layer header.
    ///
    /// Both lengths are `payload_len + 14` and the timestamp is the fixed sentinel, never the wall clock.
    pub fn synthetic(payload_len: u32) -> Result<PacketHeader, BuildError> {
        let frame_len = payload_len
            .checked_add(LINK_HEADER_LEN as u32)
            .ok_or(BuildError::InvalidLength(payload_len as i64))?;

        Ok(PacketHeader { ts_sec: SENTINEL_TS_SEC, ts_frac: SENTINEL_TS_USEC, incl_len: frame_len, orig_len: frame_len })
    }

    /// Creates a new `PacketHeader` from a slice.
    pub(crate) fn from_slice<B: ByteOrder>(slice: &[u8], snap_len: u32) -> PcapResult<(&[u8], PacketHeader)> {
        // Check header length
        if slice.len() < RECORD_HEADER_LEN {
            return Err(PcapError::IncompleteBuffer(RECORD_HEADER_LEN - slice.len()));
        }

        let header = PacketHeader {
            ts_sec: B::read_u32(&slice[0..4]),
            ts_frac: B::read_u32(&slice[4..8]),
            incl_len: B::read_u32(&slice[8..12]),
            orig_len: B::read_u32(&slice[12..16]),
        };

        if header.incl_len > snap_len {
            return Err(PcapError::InvalidField("PacketHeader incl_len > snap_len"));
        }

        if header.incl_len > header.orig_len {
            return Err(PcapError::InvalidField("PacketHeader incl_len > orig_len"));
        }

        Ok((&slice[RECORD_HEADER_LEN..], header))
    }

    /// Converts the timestamp fields to a `Duration` since EPOCH.
    pub fn timestamp(&self, ts_resolution: TsResolution) -> PcapResult<Duration> {
        let ts_nsec = match ts_resolution {
            TsResolution::MicroSecond => {
                if self.ts_frac >= 1_000_000 {
                    return Err(PcapError::InvalidField("PacketHeader ts_microsecond >= 1_000_000"));
                }
                self.ts_frac * 1000
            },
            TsResolution::NanoSecond => {
                if self.ts_frac >= 1_000_000_000 {
                    return Err(PcapError::InvalidField("PacketHeader ts_nanosecond >= 1_000_000_000"));
                }
                self.ts_frac
            },
        };

        Ok(Duration::new(self.ts_sec as u64, ts_nsec))
    }

    /// Encodes the header with the byte order `B`.
    pub fn to_bytes<B: ByteOrder>(&self) -> [u8; RECORD_HEADER_LEN] {
        let mut buf = [0_u8; RECORD_HEADER_LEN];

        B::write_u32(&mut buf[0..4], self.ts_sec);
        B::write_u32(&mut buf[4..8], self.ts_frac);
        B::write_u32(&mut buf[8..12], self.incl_len);
        B::write_u32(&mut buf[12..16], self.orig_len);

        buf
    }

    /// Write a `PacketHeader` to a writer.
    ///
    /// Writes 16B in the writer on success.
    pub fn write_to<W: Write, B: ByteOrder>(&self, writer: &mut W) -> PcapResult<()> {
        writer.write_u32::<B>(self.ts_sec)?;
        writer.write_u32::<B>(self.ts_frac)?;
        writer.write_u32::<B>(self.incl_len)?;
        writer.write_u32::<B>(self.orig_len)?;

        Ok(())
    }
}

/// Returns the 16-byte record header for a synthetic frame whose payload is `payload_length` bytes.
///
/// The header accounts for the 14-byte link-layer header the caller emits before the payload.
///
/// # Errors
///
/// `BuildError::InvalidLength` if `payload_length` is negative or `payload_length + 14` overflows a u32.
pub fn build_record_header(payload_length: i64) -> Result<[u8; RECORD_HEADER_LEN], BuildError> {
    trace!("build_record_header({})", payload_length);

    let payload_len = u32::try_from(payload_length).map_err(|_| BuildError::InvalidLength(payload_length))?;
    let header = PacketHeader::synthetic(payload_len)?;

    Ok(header.to_bytes::<LittleEndian>())
}
