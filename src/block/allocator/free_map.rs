use crate::{
    bitmap::Bitmap,
    block::{
        BLOCK_COUNT, BLOCK_SIZE, Block, BlockId, TOTAL_BLOCKS,
        allocator::{Allocator, Error, Result},
    },
};

/// Id of the block holding the free-block map itself.
pub const RESERVED_ID: BlockId = 0;

/// A bitmap-backed `Allocator` that lives inside a single block.
///
/// Bit `i` is set iff block `i` is allocated. The bitmap spans the whole block, but only the
/// first `BLOCK_COUNT` bits are addressable; bit `RESERVED_ID` is always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeMap {
    bits: Bitmap,
}

impl FreeMap {
    /// Constructs a map with every block free except the reserved one.
    pub fn new() -> Self {
        let mut bits = Bitmap::new(BLOCK_SIZE * 8);
        bits.set(RESERVED_ID);
        Self { bits }
    }

    /// Imports a map from the raw contents of a block.
    /// The reserved bit is set regardless of what `block` holds.
    pub fn from_block(block: &Block) -> Self {
        let mut bits = Bitmap::from_bytes(BLOCK_SIZE * 8, &block.data);
        if !bits.test(RESERVED_ID) {
            log::warn!("free-block map did not reserve block {RESERVED_ID}, reserving it");
            bits.set(RESERVED_ID);
        }
        Self { bits }
    }

    /// Exports the map as the raw contents of a block.
    pub fn to_block(&self) -> Block {
        Block::new(self.bits.as_bytes())
    }

    fn check(&self, id: BlockId) -> Result<()> {
        if id == RESERVED_ID {
            Err(Error::Reserved)
        } else if id >= BLOCK_COUNT {
            Err(Error::IdOutOfBounds)
        } else {
            Ok(())
        }
    }
}

impl Default for FreeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for FreeMap {
    fn allocate(&mut self) -> Result<BlockId> {
        let id = self
            .bits
            .first_zero()
            .filter(|&id| id < BLOCK_COUNT)
            .ok_or(Error::NoSpace)?;
        self.bits.set(id);
        Ok(id)
    }

    fn request(&mut self, id: BlockId) -> Result<()> {
        self.check(id)?;
        if self.bits.test(id) {
            return Err(Error::AlreadyAllocated);
        }
        self.bits.set(id);
        Ok(())
    }

    fn release(&mut self, id: BlockId) -> Result<()> {
        self.check(id)?;
        if !self.bits.test(id) {
            return Err(Error::NotAllocated);
        }
        self.bits.reset(id);
        Ok(())
    }

    fn is_allocated(&self, id: BlockId) -> bool {
        id < BLOCK_COUNT && self.bits.test(id)
    }

    fn used(&self) -> usize {
        self.bits.count_ones(RESERVED_ID + 1..BLOCK_COUNT)
    }

    fn available(&self) -> usize {
        TOTAL_BLOCKS - self.used()
    }
}

#[cfg(test)]
mod tests {
    use crate::{block::allocator::tests::TestableAllocator, test_allocator};

    use super::*;

    impl TestableAllocator for FreeMap {
        fn new_for_test() -> Self {
            Self::new()
        }
    }

    test_allocator!(FreeMap);

    #[test]
    fn test_reserved_is_allocated() {
        let map = FreeMap::new();
        assert!(map.is_allocated(RESERVED_ID));
        assert_eq!(map.to_block().data[0], 0b0000_0001);
    }

    #[test]
    fn test_serde() {
        let mut original = FreeMap::new();
        original.request(1).unwrap();
        original.request(9).unwrap();
        original.request(255).unwrap();

        let block = original.to_block();
        assert_eq!(block.data[0], 0b0000_0011);
        assert_eq!(block.data[1], 0b0000_0010);
        assert_eq!(block.data[31], 0b1000_0000);

        let mut restored = FreeMap::from_block(&block);
        assert_eq!(restored, original);
        assert_eq!(restored.used(), 3);

        restored.release(9).unwrap();
        assert_eq!(restored.allocate().unwrap(), 2);
    }

    #[test]
    fn test_import_rereserves() {
        let map = FreeMap::from_block(&Block::default());
        assert!(map.is_allocated(RESERVED_ID));
        assert_eq!(map.used(), 0);
    }

    #[test]
    fn test_import_full_tail() {
        // Bits past BLOCK_COUNT are not addressable and never count as used or free.
        let mut block = Block::default();
        block.data[BLOCK_COUNT / 8..].fill(0xFF);
        block.data[0] = 0xFF;

        let mut map = FreeMap::from_block(&block);
        assert_eq!(map.used(), 7);
        assert_eq!(map.allocate().unwrap(), 8);
        assert_eq!(map.to_block(), {
            let mut expected = block;
            expected.data[1] = 0x01;
            expected
        });
    }

    #[test]
    fn test_import_no_space() {
        let mut block = Block::default();
        block.data[..BLOCK_COUNT / 8].fill(0xFF);

        let mut map = FreeMap::from_block(&block);
        assert_eq!(map.used(), TOTAL_BLOCKS);
        assert_eq!(map.available(), 0);
        assert_eq!(map.allocate(), Err(Error::NoSpace));
    }
}
