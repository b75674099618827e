use std::ops::Range;

use bitvec::prelude::*;

/// A fixed-length bit vector.
///
/// Bits are packed least-significant first into bytes, so bit `i` lives in byte `i / 8`
/// under mask `1 << (i % 8)`. [`Bitmap::as_bytes`] and [`Bitmap::from_bytes`] expose that
/// packing directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    bits: BitBox<u8, Lsb0>,
}

impl Bitmap {
    /// Constructs a bitmap of `len` bits, all cleared.
    pub fn new(len: usize) -> Self {
        Self {
            bits: bitbox![u8, Lsb0; 0; len],
        }
    }

    /// Reconstructs a bitmap of `len` bits from its packed representation.
    /// Bytes past the first `len` bits are ignored.
    ///
    /// # Panics
    /// Panics if `bytes` holds fewer than `len` bits.
    pub fn from_bytes(len: usize, bytes: &[u8]) -> Self {
        assert!(
            bytes.len() * 8 >= len,
            "{} bytes cannot hold {} bits",
            bytes.len(),
            len
        );
        let mut bits = BitVec::<u8, Lsb0>::from_slice(&bytes[..len.div_ceil(8)]);
        bits.truncate(len);
        Self {
            bits: bits.into_boxed_bitslice(),
        }
    }

    /// Returns the packed representation of the bitmap.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns whether bit `index` is set. Out of range bits read as cleared.
    pub fn test(&self, index: usize) -> bool {
        self.bits.get(index).is_some_and(|bit| *bit)
    }

    /// Sets bit `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    /// Clears bit `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn reset(&mut self, index: usize) {
        self.bits.set(index, false);
    }

    /// Returns the index of the lowest cleared bit, if any.
    pub fn first_zero(&self) -> Option<usize> {
        self.bits.first_zero()
    }

    /// Counts the set bits within `range`.
    ///
    /// # Panics
    /// Panics if `range` reaches past the end of the bitmap.
    pub fn count_ones(&self, range: Range<usize>) -> usize {
        self.bits[range].count_ones()
    }
}
