//! Fixed-capacity bump arena
//!
//! Page buffers are carved out of a single byte array with sequential
//! allocation. There is no per-allocation free: the arena is cleared as a
//! unit. Allocations are addressed by [`Handle`] (offset, length,
//! generation) instead of pointers, so the arena itself may be moved freely.
//!
//! Only the most recently issued handle may be resized in place.

use core::fmt;

/// Arena errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArenaError {
    /// Remaining capacity is smaller than the request
    OutOfSpace,
    /// Resize requested on a handle that is not the latest allocation
    NotLastAllocation,
    /// Handle was issued before the last `clear()`
    StaleHandle,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::OutOfSpace => f.write_str("out of space"),
            ArenaError::NotLastAllocation => f.write_str("not the last allocation"),
            ArenaError::StaleHandle => f.write_str("stale handle"),
        }
    }
}

/// Reference to a region of an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Handle {
    offset: usize,
    len: usize,
    generation: u16,
}

impl Handle {
    /// Size of the region in bytes
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the region is empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of the region inside the arena
    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Sequential allocator over `N` bytes of inline storage
pub struct Arena<const N: usize> {
    storage: [u8; N],
    /// First free byte
    top: usize,
    /// Offset of the most recent allocation, if any since the last clear
    last: Option<usize>,
    /// Bumped on every clear to invalidate outstanding handles
    generation: u16,
}

impl<const N: usize> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Arena<N> {
    /// Create an empty arena
    pub const fn new() -> Self {
        Self {
            storage: [0; N],
            top: 0,
            last: None,
            generation: 0,
        }
    }

    /// Total capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes handed out since the last clear
    pub fn used(&self) -> usize {
        self.top
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        N - self.top
    }

    /// Allocate `size` zeroed bytes
    pub fn allocate(&mut self, size: usize) -> Result<Handle, ArenaError> {
        if size > self.remaining() {
            return Err(ArenaError::OutOfSpace);
        }

        let offset = self.top;
        self.top += size;
        self.last = Some(offset);
        self.storage[offset..self.top].fill(0);

        Ok(Handle {
            offset,
            len: size,
            generation: self.generation,
        })
    }

    /// Grow or shrink the most recent allocation in place
    ///
    /// The returned handle supersedes `handle`. Grown bytes are zeroed.
    pub fn reallocate(&mut self, handle: Handle, new_size: usize) -> Result<Handle, ArenaError> {
        self.check_generation(&handle)?;
        if self.last != Some(handle.offset) || handle.end() != self.top {
            return Err(ArenaError::NotLastAllocation);
        }
        if new_size > N - handle.offset {
            return Err(ArenaError::OutOfSpace);
        }

        let new_top = handle.offset + new_size;
        if new_top > self.top {
            self.storage[self.top..new_top].fill(0);
        }
        self.top = new_top;

        Ok(Handle {
            offset: handle.offset,
            len: new_size,
            generation: self.generation,
        })
    }

    /// Borrow the bytes behind a handle
    pub fn get(&self, handle: Handle) -> Result<&[u8], ArenaError> {
        self.check(&handle)?;
        Ok(&self.storage[handle.offset..handle.end()])
    }

    /// Mutably borrow the bytes behind a handle
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut [u8], ArenaError> {
        self.check(&handle)?;
        Ok(&mut self.storage[handle.offset..handle.end()])
    }

    /// Release everything and invalidate all handles
    pub fn clear(&mut self) {
        self.top = 0;
        self.last = None;
        self.generation = self.generation.wrapping_add(1);
    }

    fn check_generation(&self, handle: &Handle) -> Result<(), ArenaError> {
        if handle.generation != self.generation {
            return Err(ArenaError::StaleHandle);
        }
        Ok(())
    }

    fn check(&self, handle: &Handle) -> Result<(), ArenaError> {
        self.check_generation(handle)?;
        // A handle superseded by a shrinking reallocate may reach past top
        if handle.end() > self.top {
            return Err(ArenaError::StaleHandle);
        }
        Ok(())
    }
}
