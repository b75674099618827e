pub mod image;


use zerocopy::FromBytes;

use crate::{
    Error, Result,
    block::{
        BLOCK_COUNT, BLOCK_SIZE, Block, BlockId, FreeMap, TOTAL_BLOCKS,
        allocator::{self, Allocator, free_map::RESERVED_ID},
        storage::Storage,
    },
};

/// A fixed-capacity block storage device.
///
/// Slot 0 holds the free-block map, the remaining `TOTAL_BLOCKS` slots hold data. Every slot
/// is read and written through the same path, so writing slot 0 replaces the allocation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStore {
    free_map: FreeMap,
    blocks: Box<[Block; TOTAL_BLOCKS]>,
}

impl BlockStore {
    /// Constructs an empty store: every data block is zeroed and free.
    pub fn new() -> Self {
        Self {
            free_map: FreeMap::new(),
            blocks: Box::new([Block::default(); TOTAL_BLOCKS]),
        }
    }

    /// Returns the number of user-addressable blocks.
    pub const fn total_blocks() -> usize {
        TOTAL_BLOCKS
    }

    /// Returns the number of allocated blocks, not counting the free-block map.
    pub fn used_blocks(&self) -> usize {
        self.free_map.used()
    }

    /// Returns the number of blocks available for allocation.
    pub fn free_blocks(&self) -> usize {
        self.free_map.available()
    }

    pub fn free_map(&self) -> &FreeMap {
        &self.free_map
    }

    /// Copies the block at `id` into the first `BLOCK_SIZE` bytes of `buf`.
    /// The block does not need to be allocated.
    ///
    /// Returns the number of bytes copied.
    pub fn read(&self, id: BlockId, buf: &mut [u8]) -> Result<usize> {
        let len = buf.len();
        let (dst, _) = Block::mut_from_prefix(buf).map_err(|_| Error::BufferTooSmall { len })?;
        self.read_at(dst, id)?;
        Ok(BLOCK_SIZE)
    }

    /// Overwrites the block at `id` with the first `BLOCK_SIZE` bytes of `buf`.
    /// The block does not need to be allocated.
    ///
    /// Returns the number of bytes copied.
    pub fn write(&mut self, id: BlockId, buf: &[u8]) -> Result<usize> {
        let (src, _) =
            Block::ref_from_prefix(buf).map_err(|_| Error::BufferTooSmall { len: buf.len() })?;
        self.write_at(src, id)?;
        Ok(BLOCK_SIZE)
    }

    /// Maps a data block id onto its index in `blocks`.
    fn data_index(id: BlockId) -> Result<usize> {
        (RESERVED_ID + 1..BLOCK_COUNT)
            .contains(&id)
            .then(|| id - 1)
            .ok_or(Error::IdOutOfBounds(id))
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for BlockStore {
    fn allocate(&mut self) -> allocator::Result<BlockId> {
        let id = self.free_map.allocate()?;
        log::debug!("allocated block {id}");
        Ok(id)
    }

    fn request(&mut self, id: BlockId) -> allocator::Result<()> {
        self.free_map.request(id)?;
        log::debug!("allocated requested block {id}");
        Ok(())
    }

    fn release(&mut self, id: BlockId) -> allocator::Result<()> {
        self.free_map.release(id)?;
        log::debug!("released block {id}");
        Ok(())
    }

    fn is_allocated(&self, id: BlockId) -> bool {
        self.free_map.is_allocated(id)
    }

    fn used(&self) -> usize {
        self.used_blocks()
    }

    fn available(&self) -> usize {
        self.free_blocks()
    }
}

impl Storage for BlockStore {
    fn read_at(&self, block: &mut Block, id: BlockId) -> Result<()> {
        *block = match id {
            RESERVED_ID => self.free_map.to_block(),
            id => self.blocks[Self::data_index(id)?],
        };
        Ok(())
    }

    fn write_at(&mut self, block: &Block, id: BlockId) -> Result<()> {
        match id {
            RESERVED_ID => self.free_map = FreeMap::from_block(block),
            id => self.blocks[Self::data_index(id)?] = *block,
        }
        log::debug!("wrote block {id}");
        Ok(())
    }

    fn capacity(&self) -> usize {
        BLOCK_COUNT
    }
}
