#[cfg(test)]
pub mod map;

use crate::{
    Result,
    block::{Block, BlockId},
};

/// An implementation of `Storage` allows reading and writing whole blocks, as well as
/// determining the block capacity.
pub trait Storage {
    /// Reads the block at `id` into `block`.
    fn read_at(&self, block: &mut Block, id: BlockId) -> Result<()>;

    /// Overwrites the block at `id` with `block`.
    fn write_at(&mut self, block: &Block, id: BlockId) -> Result<()>;

    /// Returns the number of blocks the storage can hold.
    fn capacity(&self) -> usize;
}
