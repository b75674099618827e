pub mod allocator;

pub use allocator::Allocator;
pub use allocator::free_map::FreeMap;

pub mod storage;

pub use storage::Storage;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// An identifier of a block.
pub type BlockId = usize;

/// Block size in bytes.
pub const BLOCK_SIZE: usize = 256;

/// Number of block slots, including the free-block map at id 0.
pub const BLOCK_COUNT: usize = 256;

/// Number of blocks available for allocation.
pub const TOTAL_BLOCKS: usize = BLOCK_COUNT - 1;

/// Size of a serialized store in bytes.
pub const IMAGE_SIZE: usize = BLOCK_COUNT * BLOCK_SIZE;

/// Fixed-sized byte sequence.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(FromBytes, IntoBytes, Immutable, Unaligned, KnownLayout)]
pub struct Block {
    pub data: [u8; BLOCK_SIZE],
}

impl Block {
    /// Constructs a `Block` with given data, zero-filling the remainder.
    ///
    /// # Panics
    /// Panics if:
    /// - `data` is larger than `BLOCK_SIZE`
    pub fn new(data: &[u8]) -> Self {
        let mut block = Self::default();
        block.data[..data.len()].copy_from_slice(data);
        block
    }
}

impl Default for Block {
    fn default() -> Self {
        Self {
            data: [0u8; BLOCK_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pads_with_zeros() {
        let block = Block::new(b"abc");
        assert_eq!(&block.data[..3], b"abc");
        assert!(block.data[3..].iter().all(|&b| b == 0));
    }

    #[test]
    #[should_panic]
    fn new_too_large() {
        Block::new(&[0u8; BLOCK_SIZE + 1]);
    }

    #[test]
    fn blocks_are_contiguous() {
        let blocks = [Block::new(&[0xAB]), Block::new(&[0xCD])];
        let bytes = blocks.as_bytes();
        assert_eq!(bytes.len(), BLOCK_SIZE * 2);
        assert_eq!(bytes[0], 0xAB);
        assert_eq!(bytes[BLOCK_SIZE], 0xCD);
    }

    #[test]
    fn image_geometry() {
        assert_eq!(TOTAL_BLOCKS, 255);
        assert_eq!(IMAGE_SIZE, 65536);
    }
}
