use byteorder::{ByteOrder, LittleEndian};

use crate::definitions::*;

// emit_literal writes a literal tag followed by the literal bytes and returns
// the number of bytes written. Literals never exceed one block, so at most two
// extended length bytes are needed.
pub fn emit_literal(dst: &mut [u8], lit: &[u8]) -> usize {
    let n = lit.len() - 1;

    let i = if n < 60 {
        dst[0] = (n as u8) << 2 | TAG_LITERAL;
        1
    } else if n < 0xff {
        dst[0] = 60 << 2 | TAG_LITERAL;
        dst[1] = n as u8;
        2
    } else {
        debug_assert!(n < 1 << 16);
        dst[0] = 61 << 2 | TAG_LITERAL;
        LittleEndian::write_u16(&mut dst[1..3], n as u16);
        3
    };

    dst[i..i + lit.len()].copy_from_slice(lit);
    i + lit.len()
}

// emit_copy writes as many copy tags as it takes to cover `length` and returns
// the number of bytes written. Chunks are 64 bytes while at least 68 remain,
// so the tail is never shorter than 4 and can still use the short form.
pub fn emit_copy(dst: &mut [u8], offset: usize, mut length: usize) -> usize {
    let mut i = 0;
    while length >= 68 {
        i += emit_copy_less_than_64(&mut dst[i..], offset, 64);
        length -= 64;
    }
    if length > 64 {
        i += emit_copy_less_than_64(&mut dst[i..], offset, 60);
        length -= 60;
    }
    i + emit_copy_less_than_64(&mut dst[i..], offset, length)
}

// emit_copy_less_than_64 writes a single copy tag of at most 64 bytes.
fn emit_copy_less_than_64(dst: &mut [u8], offset: usize, length: usize) -> usize {
    debug_assert!(length >= 4 && length <= 64);
    debug_assert!(offset > 0 && offset < 1 << 16);

    if length < 12 && offset < 1 << 11 {
        dst[0] = ((offset >> 8) as u8) << 5 | ((length - 4) as u8) << 2 | TAG_COPY_1;
        dst[1] = offset as u8;
        2
    } else {
        dst[0] = ((length - 1) as u8) << 2 | TAG_COPY_2;
        LittleEndian::write_u16(&mut dst[1..3], offset as u16);
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(len: usize) -> Vec<u8> {
        let lit: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let mut dst = vec![0; len + 3];
        let n = emit_literal(&mut dst, &lit);
        dst.truncate(n);
        dst
    }

    fn copy(offset: usize, length: usize) -> Vec<u8> {
        let mut dst = vec![0; 64];
        let n = emit_copy(&mut dst, offset, length);
        dst.truncate(n);
        dst
    }

    #[test]
    fn literal_headers() {
        assert_eq!(&literal(1)[..], &[0x00, 0x00]);
        assert_eq!(literal(60)[0], 59 << 2);
        assert_eq!(literal(60).len(), 61);
        assert_eq!(&literal(61)[..2], &[60 << 2, 60]);
        assert_eq!(&literal(255)[..2], &[60 << 2, 254]);
        assert_eq!(&literal(256)[..3], &[61 << 2, 0xff, 0x00]);
        assert_eq!(&literal(65536)[..3], &[61 << 2, 0xff, 0xff]);
        assert_eq!(literal(65536).len(), 65539);
    }

    #[test]
    fn literal_payload_follows_header() {
        let out = literal(61);
        assert_eq!(&out[2..], &(0..61).map(|i| i as u8).collect::<Vec<u8>>()[..]);
    }

    #[test]
    fn short_copy_form() {
        assert_eq!(copy(1, 4), vec![0x01, 0x01]);
        assert_eq!(copy(2047, 11), vec![0x01 | 7 << 2 | 7 << 5, 0xff]);
    }

    #[test]
    fn long_copy_form() {
        assert_eq!(copy(2048, 4), vec![0x02 | 3 << 2, 0x00, 0x08]);
        assert_eq!(copy(1, 12), vec![0x02 | 11 << 2, 0x01, 0x00]);
        assert_eq!(copy(65535, 64), vec![0xfe, 0xff, 0xff]);
    }

    #[test]
    fn long_copies_are_chunked() {
        // 67 does not need a 64-byte chunk: 60 + 7.
        assert_eq!(copy(10, 67), vec![0x02 | 59 << 2, 10, 0, 0x01 | 3 << 2, 10]);
        // 68 splits as 64 + 4.
        assert_eq!(copy(10, 68), vec![0xfe, 10, 0, 0x01, 10]);
        // 200 splits as 64 + 64 + 64 + 8.
        assert_eq!(
            copy(3000, 200),
            vec![0xfe, 0xb8, 0x0b, 0xfe, 0xb8, 0x0b, 0xfe, 0xb8, 0x0b, 0x02 | 7 << 2, 0xb8, 0x0b]
        );
    }
}
