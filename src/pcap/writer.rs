use std::io::Write;

use byteorder_slice::LittleEndian;
use log::trace;

use crate::errors::*;
use crate::link_layer::SyntheticLinkHeader;
use crate::pcap::{PacketHeader, PcapHeader};

/// Wraps a writer and uses it to write an app-tagged capture, one frame at a time.
///
/// Each frame is written as `record header ++ synthetic link-layer header ++ payload`.
///
/// # Examples
///
/// ```rust,no_run
/// use std::fs::File;
/// use pcap_tagger::pcap::CaptureWriter;
///
/// let file = File::create("out.pcap").expect("Error creating file");
/// let mut writer = CaptureWriter::new(file).unwrap();
///
/// // An IPv4 packet captured for the app with uid 10123
/// let ip_packet = [0x45_u8; 20];
/// writer.write_frame(10123, &ip_packet).unwrap();
/// ```
#[derive(Debug)]
pub struct CaptureWriter<W: Write> {
    snaplen: u32,
    writer: W,
}

impl<W: Write> CaptureWriter<W> {
    /// Creates a new `CaptureWriter` and writes the global header ([`PcapHeader::default`]).
    ///
    /// # Errors
    ///
    /// Return an error if the writer can't be written to.
    pub fn new(mut writer: W) -> PcapResult<CaptureWriter<W>> {
        let header = PcapHeader::default();
        header.write_to(&mut writer)?;

        Ok(CaptureWriter { snaplen: header.snaplen, writer })
    }

    /// Consumes the `CaptureWriter`, returning the wrapped writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Writes one frame carrying `payload` for the application `identifier`.
    ///
    /// # Errors
    ///
    /// `PcapError::Build` if the payload length can't be encoded,
    /// `PcapError::InvalidField` if the frame would not fit the snaplen,
    /// `PcapError::IoError` if the writer fails.
    pub fn write_frame(&mut self, identifier: u32, payload: &[u8]) -> PcapResult<()> {
        let len = i64::try_from(payload.len()).unwrap_or(i64::MAX);
        let payload_len = u32::try_from(len).map_err(|_| BuildError::InvalidLength(len))?;
        let header = PacketHeader::synthetic(payload_len)?;

        if header.incl_len > self.snaplen {
            return Err(PcapError::InvalidField("CaptureWriter: frame length > snap_len"));
        }

        trace!("Writing frame of {} bytes for identifier {}", header.incl_len, identifier);

        header.write_to::<_, LittleEndian>(&mut self.writer)?;
        SyntheticLinkHeader::new(identifier).write_to(&mut self.writer)?;
        self.writer.write_all(payload)?;

        Ok(())
    }

    /// Flushes the wrapped writer, for buffered writers that outlive the frames written.
    pub fn flush(&mut self) -> PcapResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
