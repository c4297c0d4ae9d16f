//! Compressor and decompressor for the Snappy raw block format.
//!
//! The compressed form is a varint holding the uncompressed length followed
//! by a flat stream of literal and copy tags. Input is split into 64 KiB
//! blocks that are compressed independently, but block boundaries are not
//! marked on the wire.

// Definitions
mod definitions {

    //
    // Each compressed stream begins with the varint-encoded length of the
    // decoded data, followed by a sequence of tags. Tags begin and end on byte
    // boundaries. The first byte of each tag is broken into its 2 least and 6
    // most significant bits called l and m: l ranges in [0, 4) and m ranges in
    // [0, 64). l is the tag kind. Zero means a literal tag. All other values
    // mean a copy tag.
    //
    // For literal tags:
    // - If m < 60, the next 1 + m bytes are literal bytes.
    // - Otherwise, let n be the little-endian unsigned integer denoted by the
    // next m - 59 bytes. The next 1 + n bytes after that are literal bytes.
    //
    // For copy tags, length bytes are copied from offset bytes ago:
    // - For l == 1, the offset ranges in [0, 1<<11) and the length in [4, 12).
    // The length is 4 + the low 3 bits of m. The high 3 bits of m form bits
    // 8-10 of the offset. The next byte is bits 0-7 of the offset.
    // - For l == 2, the offset ranges in [0, 1<<16) and the length in [1, 65).
    // The length is 1 + m. The offset is the little-endian unsigned integer
    // denoted by the next 2 bytes.
    // - For l == 3, the length is 1 + m and the offset is the little-endian
    // unsigned integer denoted by the next 4 bytes. Only ever decoded.
    //
    pub const TAG_LITERAL: u8 = 0x00;
    pub const TAG_COPY_1: u8 = 0x01;
    pub const TAG_COPY_2: u8 = 0x02;
    pub const TAG_COPY_4: u8 = 0x03;

    // Input is compressed in independent blocks of at most this many bytes.
    pub const BLOCK_SIZE: usize = 1 << 16;

    // Hash tables hold between 1<<3 and 1<<14 slots; blocks shorter than
    // INPUT_MARGIN never get one.
    pub const MAX_HASH_TABLE_BITS: u32 = 14;

    // Blocks shorter than this are emitted as a single literal, and the match
    // search stops this many bytes before the end of a block.
    pub const INPUT_MARGIN: usize = 15;

    // A 32-bit varint never needs more than 5 bytes.
    pub const MAX_VARINT_LEN: usize = 5;
}

mod error;
pub use self::error::{Error, Result};

mod varint;
pub use self::varint::{read_varint, write_varint};

mod table;

mod encode;

// Snappy Compressor
mod compress;
pub use self::compress::{compress, compress_into, max_compressed_len, Compressor};
#[cfg(feature = "parallel")]
pub use self::compress::compress_parallel;

// Snappy Decompressor
mod decompress;
pub use self::decompress::{decompress, decompress_into, decompressed_len};

pub use self::definitions::BLOCK_SIZE;
