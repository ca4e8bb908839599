use std::io::Read;

use super::PcapParser;
use crate::errors::*;
use crate::pcap::{PcapHeader, PcapPacket};
use crate::read_buffer::ReadBuffer;

/// Reads a pcap from a reader, one packet at a time.
///
/// # Examples
///
/// ```rust,no_run
/// use std::fs::File;
///
/// use pcap_tagger::pcap::PcapReader;
///
/// let file_in = File::open("test.pcap").expect("Error opening file");
/// let mut pcap_reader = PcapReader::new(file_in).unwrap();
///
/// // Read test.pcap
/// while let Some(pkt) = pcap_reader.next_packet() {
///     //Check if there is no error
///     let pkt = pkt.unwrap();
///
///     //Do something
/// }
/// ```
#[derive(Debug)]
pub struct PcapReader<R: Read> {
    parser: PcapParser,
    reader: ReadBuffer<R>,
}

impl<R: Read> PcapReader<R> {
    /// Create a new PcapReader from an existing reader.
    /// This function reads the global pcap header of the file to verify its integrity.
    ///
    /// The underlying reader must point to a valid pcap file/stream.
    ///
    /// # Errors
    /// Return an error if the data stream is not in a valid pcap file format,
    /// or if the underlying data are not readable.
    pub fn new(reader: R) -> PcapResult<PcapReader<R>> {
        Self::from_buffer(ReadBuffer::new(reader))
    }

    /// Same as [`PcapReader::new`] with an explicit initial buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> PcapResult<PcapReader<R>> {
        Self::from_buffer(ReadBuffer::with_capacity(reader, capacity))
    }

    fn from_buffer(mut reader: ReadBuffer<R>) -> PcapResult<PcapReader<R>> {
        let parser = reader.parse_with(PcapParser::new)?;

        Ok(PcapReader { parser, reader })
    }

    /// Consumes the `PcapReader`, returning the wrapped reader.
    pub fn into_reader(self) -> R {
        self.reader.into_inner()
    }

    /// Returns the next [`PcapPacket`], or `None` once the stream is exhausted.
    pub fn next_packet(&mut self) -> Option<PcapResult<PcapPacket<'static>>> {
        match self.reader.has_data_left() {
            Ok(true) => {
                let parser = &self.parser;
                Some(self.reader.parse_with(|src| {
                    let (rem, packet) = parser.next_packet(src)?;
                    Ok((rem, packet.into_owned()))
                }))
            },
            Ok(false) => None,
            Err(e) => Some(Err(PcapError::IoError(e))),
        }
    }

    /// Returns the global header of the pcap
    pub fn header(&self) -> PcapHeader {
        self.parser.header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap::CaptureWriter;
    use crate::DataLink;

    #[test]
    fn read_back_written_frames() {
        let mut writer = CaptureWriter::new(Vec::new()).unwrap();
        writer.write_frame(10_123, &[0x45; 20]).unwrap();
        writer.write_frame(10_124, &[]).unwrap();
        let data = writer.into_writer();

        let mut reader = PcapReader::with_capacity(&data[..], 8).unwrap();
        assert_eq!(reader.header().datalink, DataLink::ETHERNET);

        let first = reader.next_packet().unwrap().unwrap();
        assert_eq!(first.data.len(), 34);
        assert_eq!(first.orig_len, 34);

        let second = reader.next_packet().unwrap().unwrap();
        assert_eq!(&second.data[6..10], &10_124_u32.to_be_bytes());

        assert!(reader.next_packet().is_none());
    }

    #[test]
    fn truncated_record_is_an_error() {
        let mut writer = CaptureWriter::new(Vec::new()).unwrap();
        writer.write_frame(1, &[0; 8]).unwrap();
        let mut data = writer.into_writer();
        data.truncate(data.len() - 3);

        let mut reader = PcapReader::new(&data[..]).unwrap();
        assert!(matches!(reader.next_packet(), Some(Err(PcapError::IoError(_)))));
    }

    #[test]
    fn empty_stream_has_no_header() {
        assert!(PcapReader::new(&[0_u8; 0][..]).is_err());
    }
}
