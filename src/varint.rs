use crate::definitions::MAX_VARINT_LEN;
use crate::error::{Error, Result};

/// Writes `n` as a little-endian base-128 varint at the start of `dst` and
/// returns the number of bytes written (1 to 5).
///
/// Panics if `dst` is too short; callers size their buffers with
/// `max_compressed_len`.
pub fn write_varint(dst: &mut [u8], mut n: u32) -> usize {
    let mut i = 0;
    while n >= 0x80 {
        dst[i] = (n as u8) | 0x80;
        n >>= 7;
        i += 1;
    }
    dst[i] = n as u8;
    i + 1
}

/// Reads a varint from the start of `src`, returning the value and the number
/// of bytes consumed.
///
/// Fails with `Error::TruncatedHeader` if the input ends before the last
/// group, if 5 groups pass without a terminating byte, or if the groups carry
/// bits beyond 32.
pub fn read_varint(src: &[u8]) -> Result<(u32, usize)> {
    let mut n: u32 = 0;
    let mut shift: u32 = 0;
    for (i, &b) in src.iter().take(MAX_VARINT_LEN).enumerate() {
        let group = (b & 0x7f) as u32;
        if (group << shift) >> shift != group {
            return Err(Error::TruncatedHeader);
        }
        n |= group << shift;
        if b < 0x80 {
            return Ok((n, i + 1));
        }
        shift += 7;
    }
    Err(Error::TruncatedHeader)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(n: u32) -> Vec<u8> {
        let mut buf = [0; MAX_VARINT_LEN];
        let len = write_varint(&mut buf, n);
        buf[..len].to_vec()
    }

    #[test]
    fn writes_low_group_first() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(0x7f), vec![0x7f]);
        assert_eq!(encoded(0x80), vec![0x80, 0x01]);
        assert_eq!(encoded(300), vec![0xac, 0x02]);
        assert_eq!(encoded(65536), vec![0x80, 0x80, 0x04]);
        assert_eq!(encoded(u32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn reads_back_what_was_written() {
        for &n in &[0, 1, 127, 128, 16_383, 16_384, 65_536, 1 << 28, u32::MAX] {
            let buf = encoded(n);
            assert_eq!(read_varint(&buf), Ok((n, buf.len())));
        }
    }

    #[test]
    fn ignores_trailing_bytes() {
        assert_eq!(read_varint(&[0xac, 0x02, 0xff, 0xff]), Ok((300, 2)));
    }

    #[test]
    fn rejects_empty_and_unterminated() {
        assert_eq!(read_varint(&[]), Err(Error::TruncatedHeader));
        assert_eq!(read_varint(&[0x80, 0x80]), Err(Error::TruncatedHeader));
        assert_eq!(
            read_varint(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00]),
            Err(Error::TruncatedHeader)
        );
    }

    #[test]
    fn rejects_values_wider_than_32_bits() {
        assert_eq!(
            read_varint(&[0xff, 0xff, 0xff, 0xff, 0x1f]),
            Err(Error::TruncatedHeader)
        );
    }
}
