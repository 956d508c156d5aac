//! Length-prefixed strings handed to compiled code.
//!
//! Layout of one allocation (8-byte aligned):
//!
//! ```text
//! [length: u64][payload: length bytes, last one is NUL]
//!              ^ pointer seen by compiled code
//! ```
//!
//! `length` counts the NUL terminator, so `length - 1` is the printable
//! content length. Whoever releases the string must step back
//! [`HEADER_SIZE`] bytes to reach the real allocation start;
//! [`LengthPrefixed::from_raw`] does exactly that.

use std::alloc::{self, Layout};
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use crate::error::{RuntimeError, RuntimeResult};

/// Size of the length header stored in front of every payload.
pub const HEADER_SIZE: usize = size_of::<u64>();

pub(crate) const BLOCK_ALIGN: usize = align_of::<u64>();

/// Layout of a block holding the header plus `payload` bytes.
pub(crate) fn block_layout(payload: usize) -> RuntimeResult<Layout> {
    let size = HEADER_SIZE
        .checked_add(payload)
        .ok_or(RuntimeError::LengthOverflow)?;
    Layout::from_size_align(size, BLOCK_ALIGN).map_err(|_| RuntimeError::LengthOverflow)
}

/// An owned, exactly-sized length-prefixed string.
pub struct LengthPrefixed {
    base: NonNull<u8>,
    length: usize,
}

impl LengthPrefixed {
    /// Take ownership of a finished block.
    ///
    /// # Safety
    ///
    /// `base` must come from the global allocator with
    /// `block_layout(length)`, and its header must already hold `length`.
    /// The final payload byte must be NUL.
    pub(crate) unsafe fn from_block(base: NonNull<u8>, length: usize) -> Self {
        Self { base, length }
    }

    /// Payload length including the NUL terminator (the header value).
    pub fn len(&self) -> u64 {
        self.length as u64
    }

    /// True only for a zero-length block. Never true for a string produced
    /// by `readLine`: even an empty read carries its terminator.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// All payload bytes, terminator included.
    pub fn payload(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.payload_ptr(), self.length) }
    }

    /// Payload without the trailing NUL.
    pub fn content(&self) -> &[u8] {
        let payload = self.payload();
        &payload[..payload.len().saturating_sub(1)]
    }

    /// The header exactly as it sits in memory.
    pub fn header(&self) -> u64 {
        unsafe { self.base.as_ptr().cast::<u64>().read() }
    }

    fn payload_ptr(&self) -> *mut u8 {
        unsafe { self.base.as_ptr().add(HEADER_SIZE) }
    }

    /// Hand the string over as a payload pointer. Ownership moves with it.
    pub fn into_raw(self) -> *mut u8 {
        let this = ManuallyDrop::new(self);
        this.payload_ptr()
    }

    /// Reclaim a string previously released by [`LengthPrefixed::into_raw`].
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// A non-null `payload` must come from `into_raw` and must not be
    /// reclaimed twice.
    pub unsafe fn from_raw(payload: *mut u8) -> Option<Self> {
        let payload = NonNull::new(payload)?;
        let base = unsafe { payload.sub(HEADER_SIZE) };
        let header = unsafe { base.as_ptr().cast::<u64>().read() };
        let length = usize::try_from(header).ok()?;
        Some(Self { base, length })
    }

    /// Read the header in front of `payload` without taking ownership.
    ///
    /// Returns 0 for a null pointer.
    ///
    /// # Safety
    ///
    /// A non-null `payload` must point just past a valid header.
    pub unsafe fn length_of(payload: *const u8) -> u64 {
        if payload.is_null() {
            return 0;
        }
        unsafe { payload.sub(HEADER_SIZE).cast::<u64>().read() }
    }
}

impl Drop for LengthPrefixed {
    fn drop(&mut self) {
        if let Ok(layout) = block_layout(self.length) {
            unsafe { alloc::dealloc(self.base.as_ptr(), layout) };
        }
    }
}

impl fmt::Debug for LengthPrefixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LengthPrefixed")
            .field("length", &self.length)
            .field("payload", &format_args!("\"{}\"", self.payload().escape_ascii()))
            .finish()
    }
}
