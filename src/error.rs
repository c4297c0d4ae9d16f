use std::io;

use thiserror::Error;

/// Result type alias for compression and decompression.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while encoding or decoding a block stream.
///
/// Compression only fails when the caller hands it something it cannot
/// describe (an oversized input or an undersized output buffer). All other
/// variants come from decoding untrusted input and abort the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The varint length header is missing, unterminated after 5 bytes, or
    /// does not fit in 32 bits.
    #[error("snappy: corrupt length header")]
    TruncatedHeader,

    /// A literal's extended length bytes or payload run past the input.
    #[error("snappy: truncated literal at input offset {position}")]
    TruncatedLiteral { position: usize },

    /// A copy tag's offset bytes run past the input.
    #[error("snappy: truncated copy operand at input offset {position}")]
    TruncatedCopyOperand { position: usize },

    /// A copy refers to offset zero or to bytes before the start of output.
    #[error("snappy: invalid back-reference (offset = {offset}) at output offset {position}")]
    InvalidBackReference { offset: usize, position: usize },

    /// A literal or copy would write past the declared uncompressed length.
    #[error("snappy: decoded data overruns declared length at output offset {position}")]
    OutputOverrun { position: usize },

    /// The tag stream ended before producing the declared number of bytes.
    #[error("snappy: decoded {actual} bytes, header declared {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A length is larger than the format (or the given input) can carry.
    #[error("snappy: length {given} is larger than allowed ({max})")]
    TooBig { given: u64, max: u64 },

    /// A caller-supplied output buffer cannot hold the result.
    #[error("snappy: output buffer (size = {given}) is smaller than required (size = {min})")]
    BufferTooSmall { given: usize, min: usize },
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}
