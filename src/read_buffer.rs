use std::io::{Error, ErrorKind, Read};

use log::trace;

use crate::errors::*;

/// Default number of bytes buffered from the underlying reader.
pub(crate) const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Buffers a reader so that slice parsers can be driven over a stream.
///
/// The buffer doubles when a single item doesn't fit, and only once it is full of read bytes,
/// so lengths announced by the stream never drive an allocation.
#[derive(Debug)]
pub(crate) struct ReadBuffer<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    len: usize,
}

impl<R: Read> ReadBuffer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self { reader, buffer: vec![0_u8; capacity.max(1)], pos: 0, len: 0 }
    }

    /// Moves the unread bytes to the front, grows a full buffer and reads once.
    fn fill_buf(&mut self) -> Result<usize, Error> {
        self.buffer.copy_within(self.pos..self.len, 0);
        self.len -= self.pos;
        self.pos = 0;

        if self.len == self.buffer.len() {
            self.buffer.resize(self.buffer.len() * 2, 0);
        }

        let nb_read = loop {
            match self.reader.read(&mut self.buffer[self.len..]) {
                Ok(nb_read) => break nb_read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.len += nb_read;

        Ok(nb_read)
    }

    /// Runs `parser` on the buffered bytes, reading more until it stops asking for data.
    ///
    /// On success the bytes consumed by the parser are dropped from the buffer.
    pub fn parse_with<F, O>(&mut self, mut parser: F) -> PcapResult<O>
    where
        F: FnMut(&[u8]) -> PcapResult<(&[u8], O)>,
    {
        loop {
            let buf = &self.buffer[self.pos..self.len];
            let needed = match parser(buf) {
                Ok((rem, value)) => {
                    self.pos += buf.len() - rem.len();
                    return Ok(value);
                },
                Err(PcapError::IncompleteBuffer(needed)) => needed,
                Err(e) => return Err(e),
            };

            trace!("Need {} more bytes, {} buffered", needed, self.len - self.pos);

            if self.fill_buf()? == 0 {
                return Err(PcapError::IoError(Error::from(ErrorKind::UnexpectedEof)));
            }
        }
    }

    /// Returns true if there are bytes left in the buffer or in the reader.
    pub fn has_data_left(&mut self) -> Result<bool, Error> {
        if self.pos < self.len {
            return Ok(true);
        }

        Ok(self.fill_buf()? > 0)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
