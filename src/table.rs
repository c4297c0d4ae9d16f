use byteorder::{ByteOrder, LittleEndian};

use crate::definitions::MAX_HASH_TABLE_BITS;

const HASH_MULTIPLIER: u32 = 0x1e35a7bd;

// Loads the 4 bytes at `pos` as a little-endian u32.
#[inline]
pub fn load32(src: &[u8], pos: usize) -> u32 {
    LittleEndian::read_u32(&src[pos..pos + 4])
}

/// Number of hash bits for a block: the largest power of two not above
/// `block_len`, capped at `1 << MAX_HASH_TABLE_BITS` slots.
pub fn table_bits(block_len: usize) -> u32 {
    let mut bits = 2;
    while (1usize << bits) <= block_len && bits <= MAX_HASH_TABLE_BITS {
        bits += 1;
    }
    bits - 1
}

/// Maps the fingerprint of 4 bytes to the most recent block-relative position
/// they were seen at. Entries are only candidates and must be verified.
pub struct HashTable {
    slots: Vec<u16>,
    shift: u32,
}

impl HashTable {
    fn new(bits: u32) -> HashTable {
        HashTable {
            slots: vec![0; 1 << bits],
            shift: 32 - bits,
        }
    }

    fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = 0;
        }
    }

    pub fn bits(&self) -> u32 {
        32 - self.shift
    }

    #[inline]
    fn hash(&self, key: u32) -> usize {
        (key.wrapping_mul(HASH_MULTIPLIER) >> self.shift) as usize
    }

    /// Records `pos` as the latest position of the 4 bytes at `block[pos..]`.
    #[inline]
    pub fn insert(&mut self, block: &[u8], pos: usize) {
        let h = self.hash(load32(block, pos));
        self.slots[h] = pos as u16;
    }

    /// Records `pos` and returns the position it replaced.
    #[inline]
    pub fn swap(&mut self, block: &[u8], pos: usize) -> usize {
        let h = self.hash(load32(block, pos));
        let candidate = self.slots[h] as usize;
        self.slots[h] = pos as u16;
        candidate
    }
}

/// Reusable hash tables, at most one per size class.
///
/// A pool is handed out to one compression at a time through `&mut`, so it
/// never needs locking. Every acquisition zeroes the table, so nothing leaks
/// from one block to the next.
pub struct HashTablePool {
    tables: Vec<Option<HashTable>>,
}

impl HashTablePool {
    pub fn new() -> HashTablePool {
        let mut tables = Vec::with_capacity(MAX_HASH_TABLE_BITS as usize + 1);
        tables.resize_with(MAX_HASH_TABLE_BITS as usize + 1, || None);
        HashTablePool { tables }
    }

    /// Returns a zeroed table sized for a block of `block_len` bytes.
    pub(crate) fn acquire(&mut self, block_len: usize) -> &mut HashTable {
        let bits = table_bits(block_len);
        let table = self.tables[bits as usize].get_or_insert_with(|| HashTable::new(bits));
        table.reset();
        table
    }
}

impl Default for HashTablePool {
    fn default() -> HashTablePool {
        HashTablePool::new()
    }
}
