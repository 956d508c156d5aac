//! Growable byte buffer behind `readLine`.
//!
//! The buffer owns a single allocation shaped like the finished
//! [`LengthPrefixed`] block: [`HEADER_SIZE`] bytes reserved up front, then
//! the payload region. Bytes are addressed by index from the current base,
//! so a reallocation that moves the block never leaves a stale cursor.

use std::alloc::{self, Layout};
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use tracing::trace;

use crate::error::{RuntimeError, RuntimeResult};
use crate::prefixed::{BLOCK_ALIGN, HEADER_SIZE, LengthPrefixed, block_layout};

pub struct LineBuffer {
    base: NonNull<u8>,
    /// Size of the payload region.
    capacity: usize,
    /// Pushes left before the next growth.
    remaining: usize,
    written: usize,
    growths: u32,
}

impl LineBuffer {
    /// Allocate a buffer with `capacity` payload bytes (at least one).
    pub fn with_capacity(capacity: usize) -> RuntimeResult<Self> {
        let capacity = capacity.max(1);
        let layout = block_layout(capacity)?;
        let base = NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(RuntimeError::Alloc {
            requested: layout.size(),
        })?;
        Ok(Self {
            base,
            capacity,
            remaining: capacity,
            written: 0,
            growths: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Number of doublings performed so far.
    pub fn growths(&self) -> u32 {
        self.growths
    }

    /// Bytes pushed so far.
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.payload_ptr(), self.written) }
    }

    /// Append one byte, doubling the capacity first when this byte would
    /// fill the last free slot. That slot is kept for the NUL terminator.
    pub fn push(&mut self, byte: u8) -> RuntimeResult<()> {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.grow()?;
        }
        unsafe { self.payload_ptr().add(self.written).write(byte) };
        self.written += 1;
        Ok(())
    }

    fn grow(&mut self) -> RuntimeResult<()> {
        let previous = self.capacity;
        let capacity = previous
            .checked_mul(2)
            .ok_or(RuntimeError::LengthOverflow)?;
        self.resize(capacity)?;
        self.remaining = previous;
        self.growths += 1;
        trace!(previous, capacity, written = self.written, "line buffer grown");
        Ok(())
    }

    /// Reallocate the whole block (header included) to hold `capacity`
    /// payload bytes. On failure the old block stays owned by `self`.
    fn resize(&mut self, capacity: usize) -> RuntimeResult<()> {
        let new_layout = block_layout(capacity)?;
        let raw = unsafe { alloc::realloc(self.base.as_ptr(), self.layout(), new_layout.size()) };
        self.base = NonNull::new(raw).ok_or(RuntimeError::Alloc {
            requested: new_layout.size(),
        })?;
        self.capacity = capacity;
        Ok(())
    }

    /// Terminate, stamp the header and trim the block to its exact size.
    pub fn finish(mut self) -> RuntimeResult<LengthPrefixed> {
        unsafe { self.payload_ptr().add(self.written).write(0) };
        self.written += 1;

        let length = u64::try_from(self.written).map_err(|_| RuntimeError::LengthOverflow)?;
        unsafe { self.base.as_ptr().cast::<u64>().write(length) };

        self.resize(self.written)?;

        let this = ManuallyDrop::new(self);
        Ok(unsafe { LengthPrefixed::from_block(this.base, this.written) })
    }

    fn layout(&self) -> Layout {
        // The layout was validated when the block reached this capacity.
        unsafe { Layout::from_size_align_unchecked(HEADER_SIZE + self.capacity, BLOCK_ALIGN) }
    }

    fn payload_ptr(&self) -> *mut u8 {
        unsafe { self.base.as_ptr().add(HEADER_SIZE) }
    }
}

impl Drop for LineBuffer {
    fn drop(&mut self) {
        unsafe { alloc::dealloc(self.base.as_ptr(), self.layout()) };
    }
}
