use thiserror::Error;

/// Result type used by the pcap reader, parser, writer and assembler.
pub type PcapResult<T> = Result<T, PcapError>;

/* ----- enum BuildError ----- */

/// Errors returned by the per-frame header builders.
///
/// Out-of-range inputs are always reported, never wrapped or truncated.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum BuildError {
    /// The payload length is negative or `payload_length + 14` does not fit in a u32.
    #[error("Invalid payload length: {0}")]
    InvalidLength(i64),
    /// The application identifier is not representable as a 32-bit unsigned integer.
    #[error("Invalid application identifier: {0} is not in i32::MIN..=u32::MAX")]
    InvalidIdentifier(i64),
}

/* ----- enum PcapError ----- */

/// Errors that can occur while parsing, reading or writing a pcap capture.
#[derive(Debug, Error)]
pub enum PcapError {
    /// The buffer is too small to parse the expected data.
    /// # Fields
    /// - 0: number of missing bytes
    #[error("Need {0} more bytes")]
    IncompleteBuffer(usize),
    /// An I/O error occurred while reading or writing.
    #[error("Error reading or writing bytes")]
    IoError(#[source] std::io::Error),
    /// A field of the capture is invalid.
    #[error("Invalid field value: {0}")]
    InvalidField(&'static str),
    /// A synthetic header could not be built for a frame.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl From<std::io::Error> for PcapError {
    fn from(err: std::io::Error) -> Self {
        PcapError::IoError(err)
    }
}

/* ----- enum DecodeError ----- */

/// Errors returned when dumping a capture to text.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The capture could not be opened, or its header or one of its records is malformed.
    #[error("Capture is unreadable or malformed")]
    UnreadableOrMalformed(#[source] PcapError),
    /// The text dump could not be written.
    #[error("I/O error while writing the text dump")]
    WriteFailed(#[source] std::io::Error),
}

impl From<PcapError> for DecodeError {
    fn from(err: PcapError) -> Self {
        DecodeError::UnreadableOrMalformed(err)
    }
}
