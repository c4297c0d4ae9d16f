use log::{debug, trace};

use crate::definitions::*;
use crate::encode::{emit_copy, emit_literal};
use crate::error::{Error, Result};
use crate::table::{load32, HashTable, HashTablePool};
use crate::varint::write_varint;

/// Compresses whole buffers, keeping its hash tables between calls.
///
/// A `Compressor` is cheap to create, but reusing one across many calls
/// avoids reallocating a table for every call.
pub struct Compressor {
    tables: HashTablePool,
}

impl Compressor {
    pub fn new() -> Compressor {
        Compressor {
            tables: HashTablePool::new(),
        }
    }

    /// Returns the compressed form of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is longer than `u32::MAX` bytes, which the length
    /// header cannot describe.
    pub fn compress(&mut self, src: &[u8]) -> Vec<u8> {
        assert!(
            src.len() as u64 <= u32::MAX as u64,
            "snappy: input buffer (size = {}) is larger than allowed",
            src.len()
        );
        let mut dst = vec![0; max_compressed_len(src.len())];
        let n = self.encode(&mut dst, src);
        dst.truncate(n);
        dst
    }

    /// Writes the compressed form of `src` into `dst` and returns the number
    /// of bytes written.
    ///
    /// `dst` must hold at least `max_compressed_len(src.len())` bytes.
    pub fn compress_into(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        if src.len() as u64 > u32::MAX as u64 {
            return Err(Error::TooBig {
                given: src.len() as u64,
                max: u32::MAX as u64,
            });
        }
        let min = max_compressed_len(src.len());
        if dst.len() < min {
            return Err(Error::BufferTooSmall { given: dst.len(), min });
        }
        Ok(self.encode(dst, src))
    }

    fn encode(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        debug!("snappy: compressing {} bytes", src.len());

        // Start with the varint-encoded length of the decompressed bytes.
        let mut d = write_varint(dst, src.len() as u32);

        for (i, block) in src.chunks(BLOCK_SIZE).enumerate() {
            let n = compress_block(&mut dst[d..], block, &mut self.tables);
            trace!("snappy: block {} ({} bytes) -> {} bytes", i, block.len(), n);
            d += n;
        }

        debug!("snappy: compressed {} bytes into {}", src.len(), d);
        d
    }
}

impl Default for Compressor {
    fn default() -> Compressor {
        Compressor::new()
    }
}

/// Returns the compressed form of `src`.
///
/// # Panics
///
/// Panics if `src` is longer than `u32::MAX` bytes.
pub fn compress(src: &[u8]) -> Vec<u8> {
    Compressor::new().compress(src)
}

/// Writes the compressed form of `src` into `dst` and returns the length
/// written. Fails if `dst` is shorter than `max_compressed_len(src.len())`.
pub fn compress_into(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    Compressor::new().compress_into(dst, src)
}

/// Compresses blocks on the rayon thread pool. The output is identical to
/// `compress`.
///
/// # Panics
///
/// Panics if `src` is longer than `u32::MAX` bytes.
#[cfg(feature = "parallel")]
pub fn compress_parallel(src: &[u8]) -> Vec<u8> {
    use rayon::prelude::*;

    assert!(
        src.len() as u64 <= u32::MAX as u64,
        "snappy: input buffer (size = {}) is larger than allowed",
        src.len()
    );
    debug!("snappy: compressing {} bytes in parallel", src.len());

    let blocks: Vec<Vec<u8>> = src
        .par_chunks(BLOCK_SIZE)
        .map_init(HashTablePool::new, |tables, block| {
            let mut out = vec![0; max_compressed_len(block.len())];
            let n = compress_block(&mut out, block, tables);
            out.truncate(n);
            out
        })
        .collect();

    let mut dst = vec![0; max_compressed_len(src.len())];
    let mut d = write_varint(&mut dst, src.len() as u32);
    for block in blocks {
        dst[d..d + block.len()].copy_from_slice(&block);
        d += block.len();
    }
    dst.truncate(d);
    dst
}

/// max_compressed_len returns the maximum length of a compressed stream,
/// given its uncompressed length.
pub fn max_compressed_len(src_len: usize) -> usize {
    32 + src_len + src_len / 6
}

// A match accepted by the greedy parse: the 4 bytes at `start` equal the 4
// bytes at `candidate`, and `candidate < start`.
struct Match {
    start: usize,
    candidate: usize,
}

// MatchFinder walks one block and proposes matches in increasing order. Once
// a match is taken the caller reports where it ended through `resume_at`.
struct MatchFinder<'a> {
    block: &'a [u8],
    table: &'a mut HashTable,
    // No match may start past this position.
    limit: usize,
    // Where the next search begins.
    ip: usize,
    // A match starting exactly at `ip`, found while resuming.
    adjacent: Option<usize>,
    done: bool,
}

impl<'a> MatchFinder<'a> {
    fn new(block: &'a [u8], table: &'a mut HashTable) -> MatchFinder<'a> {
        MatchFinder {
            block,
            table,
            limit: block.len() - INPUT_MARGIN,
            ip: 1,
            adjacent: None,
            done: false,
        }
    }

    fn next_match(&mut self) -> Option<Match> {
        if self.done {
            return None;
        }
        if let Some(candidate) = self.adjacent.take() {
            return Some(Match {
                start: self.ip,
                candidate,
            });
        }

        // Probe every position at first, then step further apart the longer
        // nothing matches: 32 probes at stride 1, 32 at stride 2, and so on.
        let mut skip: usize = 32;
        let mut ip = self.ip;
        while ip <= self.limit {
            let candidate = self.table.swap(self.block, ip);
            if load32(self.block, ip) == load32(self.block, candidate) {
                return Some(Match { start: ip, candidate });
            }
            ip += skip >> 5;
            skip += 1;
        }
        self.done = true;
        None
    }

    // Called with the end of the copy just emitted. Records the positions
    // around it and checks whether another match starts right there.
    fn resume_at(&mut self, ip: usize) {
        if ip >= self.limit {
            self.done = true;
            return;
        }
        self.table.insert(self.block, ip - 1);
        let candidate = self.table.swap(self.block, ip);
        if load32(self.block, ip) == load32(self.block, candidate) {
            self.ip = ip;
            self.adjacent = Some(candidate);
        } else {
            self.ip = ip + 1;
        }
    }
}

// compress_block encodes one block as literal and copy tags into `dst` and
// returns the number of bytes written. Copies never reach outside the block.
fn compress_block(dst: &mut [u8], block: &[u8], tables: &mut HashTablePool) -> usize {
    let mut d = 0;
    let mut lit = 0;

    if block.len() >= INPUT_MARGIN {
        let table = tables.acquire(block.len());
        trace!("snappy: {}-bit hash table for {} bytes", table.bits(), block.len());
        let mut finder = MatchFinder::new(block, table);

        while let Some(m) = finder.next_match() {
            // Emit any pending literal bytes.
            if m.start > lit {
                d += emit_literal(&mut dst[d..], &block[lit..m.start]);
            }

            // Extend the match to be as long as possible.
            let mut matched = 4;
            while m.start + matched < block.len()
                && block[m.start + matched] == block[m.candidate + matched]
            {
                matched += 1;
            }

            d += emit_copy(&mut dst[d..], m.start - m.candidate, matched);
            lit = m.start + matched;
            finder.resume_at(lit);
        }
    }

    // Emit any final pending literal bytes.
    if lit < block.len() {
        d += emit_literal(&mut dst[d..], &block[lit..]);
    }
    d
}
