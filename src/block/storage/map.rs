use std::collections::HashMap;

use crate::{
    Error, Result,
    block::{BLOCK_COUNT, Block, BlockId, storage::Storage},
};

/// A sparse in-memory `Storage`; unwritten blocks read as zeroes.
#[derive(Default)]
pub struct MapStorage {
    blocks: HashMap<BlockId, Block>,
}

impl Storage for MapStorage {
    fn read_at(&self, block: &mut Block, id: BlockId) -> Result<()> {
        if id >= BLOCK_COUNT {
            return Err(Error::IdOutOfBounds(id));
        }
        *block = self.blocks.get(&id).copied().unwrap_or_default();
        Ok(())
    }

    fn write_at(&mut self, block: &Block, id: BlockId) -> Result<()> {
        if id >= BLOCK_COUNT {
            return Err(Error::IdOutOfBounds(id));
        }
        self.blocks.insert(id, *block);
        Ok(())
    }

    fn capacity(&self) -> usize {
        BLOCK_COUNT
    }
}

#[cfg(test)]
mod tests {
    use crate::{block::storage::tests::TestableStorage, test_storage};

    use super::*;

    impl TestableStorage for MapStorage {
        fn new_for_test() -> Self {
            Self::default()
        }
    }

    test_storage!(MapStorage);
}
