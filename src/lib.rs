//! A fixed-capacity block storage device.
//!
//! [`BlockStore`] holds [`block::BLOCK_COUNT`] slots of [`block::BLOCK_SIZE`] bytes.
//! Slot 0 is the free-block map and is never handed out; the remaining slots are
//! data blocks. A store can be dumped to and restored from a flat image file.

pub mod bitmap;
pub mod block;
pub mod error;
pub mod ffi;
pub mod store;

pub use error::{Error, Result};
pub use store::BlockStore;
