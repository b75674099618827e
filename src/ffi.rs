//! C ABI over [`BlockStore`].
//!
//! Errors are reported through sentinels: `SIZE_MAX` from functions returning an id or a
//! count, `false` from `block_store_request`, `0` from functions returning a byte count and
//! null from functions returning a store. Null store, buffer and filename pointers are
//! accepted everywhere and fail with the sentinel.

use std::{
    ffi::{CStr, OsStr, c_char, c_void},
    os::unix::ffi::OsStrExt,
    path::Path,
    ptr, slice,
};

use crate::{
    BlockStore,
    block::{Allocator, BLOCK_COUNT, BLOCK_SIZE},
};

/// Returned by functions yielding an id or a count on error.
pub const SIZE_MAX: usize = usize::MAX;

/// Creates an empty store. Release it with [`block_store_destroy`].
#[unsafe(no_mangle)]
pub extern "C" fn block_store_create() -> *mut BlockStore {
    Box::into_raw(Box::new(BlockStore::new()))
}

/// Destroys a store. Null is ignored.
///
/// # Safety
/// `bs` must be null or a pointer returned by this library that has not been destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_destroy(bs: *mut BlockStore) {
    if !bs.is_null() {
        drop(unsafe { Box::from_raw(bs) });
    }
}

/// Allocates the lowest free block and returns its id, or `SIZE_MAX`.
///
/// # Safety
/// `bs` must be null or a live store.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_allocate(bs: *mut BlockStore) -> usize {
    let Some(bs) = (unsafe { bs.as_mut() }) else {
        return SIZE_MAX;
    };
    bs.allocate().unwrap_or(SIZE_MAX)
}

/// Allocates the block at `block_id` if it is free.
///
/// # Safety
/// `bs` must be null or a live store.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_request(bs: *mut BlockStore, block_id: usize) -> bool {
    let Some(bs) = (unsafe { bs.as_mut() }) else {
        return false;
    };
    bs.request(block_id).is_ok()
}

/// Frees the block at `block_id`. Invalid or free ids are ignored.
///
/// # Safety
/// `bs` must be null or a live store.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_release(bs: *mut BlockStore, block_id: usize) {
    if let Some(bs) = unsafe { bs.as_mut() } {
        let _ = bs.release(block_id);
    }
}

/// # Safety
/// `bs` must be null or a live store.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_get_used_blocks(bs: *const BlockStore) -> usize {
    let Some(bs) = (unsafe { bs.as_ref() }) else {
        return SIZE_MAX;
    };
    match bs.used_blocks() {
        used if used >= BLOCK_COUNT => SIZE_MAX,
        used => used,
    }
}

/// # Safety
/// `bs` must be null or a live store.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_get_free_blocks(bs: *const BlockStore) -> usize {
    match unsafe { block_store_get_used_blocks(bs) } {
        SIZE_MAX => SIZE_MAX,
        used => BlockStore::total_blocks() - used,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn block_store_get_total_blocks() -> usize {
    BlockStore::total_blocks()
}

/// Copies the block at `block_id` into `buffer`. Returns the number of bytes copied, or 0.
///
/// # Safety
/// `bs` must be null or a live store. `buffer` must be null or valid for writes of
/// `BLOCK_SIZE` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_read(
    bs: *const BlockStore,
    block_id: usize,
    buffer: *mut c_void,
) -> usize {
    let Some(bs) = (unsafe { bs.as_ref() }) else {
        return 0;
    };
    if buffer.is_null() {
        return 0;
    }
    let buffer = unsafe { slice::from_raw_parts_mut(buffer.cast::<u8>(), BLOCK_SIZE) };
    bs.read(block_id, buffer).unwrap_or(0)
}

/// Overwrites the block at `block_id` with `buffer`. Returns the number of bytes copied, or 0.
///
/// # Safety
/// `bs` must be null or a live store. `buffer` must be null or valid for reads of
/// `BLOCK_SIZE` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_write(
    bs: *mut BlockStore,
    block_id: usize,
    buffer: *const c_void,
) -> usize {
    let Some(bs) = (unsafe { bs.as_mut() }) else {
        return 0;
    };
    if buffer.is_null() {
        return 0;
    }
    let buffer = unsafe { slice::from_raw_parts(buffer.cast::<u8>(), BLOCK_SIZE) };
    bs.write(block_id, buffer).unwrap_or(0)
}

/// Loads a store from the image at `filename`, or returns null.
///
/// # Safety
/// `filename` must be null or a nul-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_deserialize(filename: *const c_char) -> *mut BlockStore {
    let Some(path) = (unsafe { path_from_ptr(filename) }) else {
        return ptr::null_mut();
    };
    match BlockStore::deserialize(path) {
        Ok(bs) => Box::into_raw(Box::new(bs)),
        Err(err) => {
            log::warn!("failed to deserialize {}: {err:?}", path.display());
            ptr::null_mut()
        }
    }
}

/// Writes the store to `filename`. Returns the number of bytes written, or 0.
///
/// # Safety
/// `bs` must be null or a live store. `filename` must be null or a nul-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn block_store_serialize(
    bs: *const BlockStore,
    filename: *const c_char,
) -> usize {
    let Some(bs) = (unsafe { bs.as_ref() }) else {
        return 0;
    };
    let Some(path) = (unsafe { path_from_ptr(filename) }) else {
        return 0;
    };
    bs.serialize(path).unwrap_or_else(|err| {
        log::warn!("failed to serialize {}: {err:?}", path.display());
        0
    })
}

unsafe fn path_from_ptr<'a>(filename: *const c_char) -> Option<&'a Path> {
    if filename.is_null() {
        return None;
    }
    let filename = unsafe { CStr::from_ptr(filename) };
    Some(Path::new(OsStr::from_bytes(filename.to_bytes())))
}
