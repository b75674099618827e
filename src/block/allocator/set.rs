use std::collections::BTreeSet;

use crate::block::{
    BLOCK_COUNT, BlockId, TOTAL_BLOCKS,
    allocator::{Allocator, Error, Result},
};

/// A set-backed reference `Allocator`.
#[derive(Debug, Clone, Default)]
pub struct SetAllocator {
    allocations: BTreeSet<BlockId>,
}

impl SetAllocator {
    fn check(id: BlockId) -> Result<()> {
        match id {
            0 => Err(Error::Reserved),
            id if id >= BLOCK_COUNT => Err(Error::IdOutOfBounds),
            _ => Ok(()),
        }
    }
}

impl Allocator for SetAllocator {
    fn allocate(&mut self) -> Result<BlockId> {
        let id = (1..BLOCK_COUNT)
            .find(|id| !self.allocations.contains(id))
            .ok_or(Error::NoSpace)?;
        self.allocations.insert(id);
        Ok(id)
    }

    fn request(&mut self, id: BlockId) -> Result<()> {
        Self::check(id)?;
        if !self.allocations.insert(id) {
            return Err(Error::AlreadyAllocated);
        }
        Ok(())
    }

    fn release(&mut self, id: BlockId) -> Result<()> {
        Self::check(id)?;
        if !self.allocations.remove(&id) {
            return Err(Error::NotAllocated);
        }
        Ok(())
    }

    fn is_allocated(&self, id: BlockId) -> bool {
        self.allocations.contains(&id)
    }

    fn used(&self) -> usize {
        self.allocations.len()
    }

    fn available(&self) -> usize {
        TOTAL_BLOCKS - self.allocations.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::{block::allocator::tests::TestableAllocator, test_allocator};

    use super::*;

    impl TestableAllocator for SetAllocator {
        fn new_for_test() -> Self {
            Self::default()
        }
    }

    test_allocator!(SetAllocator);
}
