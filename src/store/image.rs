//! Persistence of a [`BlockStore`] as a flat image file.
//!
//! An image is `BLOCK_COUNT` raw blocks in ascending id order with no header, so block 0 is
//! the packed free-block map. Bytes past `IMAGE_SIZE` are ignored on load.

use std::{
    fs::{File, OpenOptions},
    io,
    os::unix::fs::FileExt,
    path::Path,
};

use zerocopy::IntoBytes;

use crate::{
    Error, Result,
    block::{BLOCK_COUNT, BLOCK_SIZE, Block, BlockId, storage::Storage},
    store::BlockStore,
};

fn offset(id: BlockId) -> u64 {
    (id * BLOCK_SIZE) as u64
}

impl BlockStore {
    /// Writes the whole store to `path`, creating or truncating the file.
    ///
    /// Returns the number of bytes written, which is always `IMAGE_SIZE`.
    pub fn serialize(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let mut block = Block::default();
        let mut written = 0;
        for id in 0..BLOCK_COUNT {
            self.read_at(&mut block, id)?;
            file.write_all_at(block.as_bytes(), offset(id))?;
            written += BLOCK_SIZE;
        }
        file.sync_all()?;

        log::debug!("serialized {written} bytes to {}", path.display());
        Ok(written)
    }

    /// Reads a store from the image at `path`.
    ///
    /// Every slot, including the free-block map, is restored through the same path as
    /// [`BlockStore::write`]. A file shorter than `IMAGE_SIZE` is rejected.
    pub fn deserialize(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let mut store = Self::new();
        let mut block = Block::default();
        for id in 0..BLOCK_COUNT {
            file.read_exact_at(block.as_mut_bytes(), offset(id))
                .map_err(|err| match err.kind() {
                    io::ErrorKind::UnexpectedEof => {
                        log::warn!("image {} ends before block {id}", path.display());
                        Error::Truncated { id }
                    }
                    _ => Error::Io(err),
                })?;
            store.write_at(&block, id)?;
        }

        log::debug!(
            "deserialized {} with {} blocks in use",
            path.display(),
            store.used_blocks()
        );
        Ok(store)
    }
}
