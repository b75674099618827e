use std::io;

use crate::block::{BlockId, allocator};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Allocator(allocator::Error),

    // Block I/O
    IdOutOfBounds(BlockId),
    BufferTooSmall { len: usize },

    // Persistence
    Truncated { id: BlockId },
    Io(io::Error),
}

impl From<allocator::Error> for Error {
    fn from(err: allocator::Error) -> Self {
        Self::Allocator(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<Error> for libc::c_int {
    fn from(err: Error) -> Self {
        match err {
            Error::Allocator(err) => err.into(),
            Error::IdOutOfBounds(_) => libc::EINVAL,
            Error::BufferTooSmall { .. } => libc::EINVAL,
            Error::Truncated { .. } => libc::EIO,
            Error::Io(err) => err.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}
