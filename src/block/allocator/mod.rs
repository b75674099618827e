#[cfg(test)]
pub mod set;

pub mod free_map;

use crate::block::BlockId;

/// An implementation of `Allocator` can manage allocation of single blocks.
///
/// Id 0 is reserved and is never allocated, requested or released.
pub trait Allocator {
    /// Allocates the lowest free block, returning its id.
    fn allocate(&mut self) -> Result<BlockId>;

    /// Allocates the block at `id`.
    fn request(&mut self, id: BlockId) -> Result<()>;

    /// Deallocates the block at `id`.
    fn release(&mut self, id: BlockId) -> Result<()>;

    /// Returns whether the block at `id` is allocated.
    fn is_allocated(&self, id: BlockId) -> bool;

    /// Returns the number of allocated blocks, not counting the reserved one.
    fn used(&self) -> usize;

    /// Returns the number of blocks available for allocation.
    fn available(&self) -> usize;
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    NoSpace,
    Reserved,
    IdOutOfBounds,
    AlreadyAllocated,
    NotAllocated,
}

impl From<Error> for libc::c_int {
    fn from(err: Error) -> Self {
        match err {
            Error::NoSpace => libc::ENOSPC,
            Error::Reserved => libc::EINVAL,
            Error::IdOutOfBounds => libc::EINVAL,
            Error::AlreadyAllocated => libc::EEXIST,
            Error::NotAllocated => libc::EINVAL,
        }
    }
}
