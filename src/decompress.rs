use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::definitions::*;
use crate::error::{Error, Result};
use crate::varint::read_varint;

// No tag expands to more than 64 bytes, and every copy tag takes at least
// 2 bytes of input, so a body can never decode to more than this many bytes
// per input byte.
const MAX_EXPANSION: u64 = 32;

/// decompressed_len returns the length of the decoded stream, read from the
/// varint header of `src`.
pub fn decompressed_len(src: &[u8]) -> Result<usize> {
    let (n, _) = read_varint(src)?;
    Ok(n as usize)
}

/// Returns the decoded form of `src`.
///
/// Any malformed or truncated input is rejected as a whole; no partial
/// output is returned.
///
/// The first bytes of `src` are always read as the length header, and a
/// header declaring more than the remaining input could expand to fails with
/// `Error::TooBig` before any tag is looked at. A lone byte such as `[0x04]`
/// is therefore a length header with an empty body, not a truncated literal.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>> {
    let (n, header_len) = read_header(src)?;
    let mut dst = vec![0; n];
    decode_body(&mut dst, &src[header_len..])?;
    Ok(dst)
}

/// Decodes `src` into `dst` and returns the number of bytes written.
///
/// `dst` must hold at least `decompressed_len(src)` bytes. On error the
/// contents of `dst` are unspecified.
pub fn decompress_into(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    let (n, header_len) = read_header(src)?;
    if dst.len() < n {
        return Err(Error::BufferTooSmall { given: dst.len(), min: n });
    }
    decode_body(&mut dst[..n], &src[header_len..])?;
    Ok(n)
}

// Reads the length header and rejects lengths the body cannot produce.
fn read_header(src: &[u8]) -> Result<(usize, usize)> {
    let (n, header_len) = read_varint(src).map_err(rejected)?;
    let max = (src.len() - header_len) as u64 * MAX_EXPANSION;
    if n as u64 > max {
        return Err(rejected(Error::TooBig { given: n as u64, max }));
    }
    debug!("snappy: decompressing {} bytes into {}", src.len(), n);
    Ok((n as usize, header_len))
}

fn decode_body(dst: &mut [u8], body: &[u8]) -> Result<()> {
    let d = decode_tags(dst, body).map_err(rejected)?;
    if d != dst.len() {
        return Err(rejected(Error::LengthMismatch {
            expected: dst.len(),
            actual: d,
        }));
    }
    Ok(())
}

fn rejected(err: Error) -> Error {
    debug!("snappy: rejecting corrupt input: {}", err);
    err
}

// decode_tags runs the tag stream in `src` into `dst` and returns the number
// of bytes produced. Every literal and copy is bounds checked against both
// buffers before a single byte is moved.
fn decode_tags(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    let mut s: usize = 0;
    let mut d: usize = 0;

    while s < src.len() {
        let tag = src[s];
        s += 1;

        let (offset, length) = match tag & 0x03 {
            // Parse a Literal
            TAG_LITERAL => {
                let mut length = (tag >> 2) as u64 + 1;
                if length > 60 {
                    // Tags 60..63 carry 1 to 4 little-endian length bytes.
                    let extra = (length - 60) as usize;
                    if src.len() - s < extra {
                        return Err(Error::TruncatedLiteral { position: s });
                    }
                    length = LittleEndian::read_uint(&src[s..s + extra], extra) + 1;
                    s += extra;
                }
                if ((src.len() - s) as u64) < length {
                    return Err(Error::TruncatedLiteral { position: s });
                }
                if ((dst.len() - d) as u64) < length {
                    return Err(Error::OutputOverrun { position: d });
                }
                let length = length as usize;
                dst[d..d + length].copy_from_slice(&src[s..s + length]);
                d += length;
                s += length;
                continue;
            }

            // Parse a Copy1
            TAG_COPY_1 => {
                if src.len() - s < 1 {
                    return Err(Error::TruncatedCopyOperand { position: s });
                }
                let length = ((tag >> 2) & 0x07) as usize + 4;
                let offset = ((tag as usize) >> 5) << 8 | src[s] as usize;
                s += 1;
                (offset, length)
            }

            // Parse a Copy2
            TAG_COPY_2 => {
                if src.len() - s < 2 {
                    return Err(Error::TruncatedCopyOperand { position: s });
                }
                let length = (tag >> 2) as usize + 1;
                let offset = LittleEndian::read_u16(&src[s..s + 2]) as usize;
                s += 2;
                (offset, length)
            }

            // Parse a Copy4
            _ => {
                debug_assert_eq!(tag & 0x03, TAG_COPY_4);
                if src.len() - s < 4 {
                    return Err(Error::TruncatedCopyOperand { position: s });
                }
                let length = (tag >> 2) as usize + 1;
                let offset = LittleEndian::read_u32(&src[s..s + 4]) as usize;
                s += 4;
                (offset, length)
            }
        };

        if offset == 0 || offset > d {
            return Err(Error::InvalidBackReference { offset, position: d });
        }
        if dst.len() - d < length {
            return Err(Error::OutputOverrun { position: d });
        }
        self_copy(dst, d, offset, length);
        d += length;
    }

    Ok(d)
}

// self_copy reproduces `length` bytes from `offset` bytes before `d`. When
// the ranges overlap, bytes written earlier in the same copy are the source
// for later ones, so the copy must run one byte at a time.
fn self_copy(dst: &mut [u8], d: usize, offset: usize, length: usize) {
    let from = d - offset;
    if offset >= length {
        dst.copy_within(from..from + length, d);
    } else {
        for i in 0..length {
            dst[d + i] = dst[from + i];
        }
    }
}
