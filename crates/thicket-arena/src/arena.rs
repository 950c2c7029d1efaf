//! The bump allocator every other structure draws from.
//!
//! A [`MemoryArena`] is a fixed buffer of 32-bit atomic words with a
//! single atomic cursor. Allocation is one `fetch_add`: wait-free, never
//! failing, never freeing. Addresses handed out are byte offsets into
//! the buffer ([`Addr`]); all reads and writes go through the arena's
//! word accessors.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crossbeam_utils::CachePadded;
use tracing::debug;

use crate::config::ArenaConfig;
use crate::error::ArenaError;

/// Byte offset returned by [`MemoryArena::alloc`].
pub type PtrOffset = u32;

/// A byte address inside a [`MemoryArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Addr(pub u32);

impl Addr {
    /// The address `bytes` past this one.
    #[inline]
    #[must_use]
    pub fn offset(self, bytes: u32) -> Self {
        Self(self.0 + bytes)
    }

    /// The raw byte offset.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Atomic bump allocator over a fixed backing buffer.
///
/// The cursor only moves forward for the lifetime of a generation.
/// Offsets 0 and 1 are never handed out: the cursor starts at
/// [`MemoryArena::ALIGNMENT`], so every allocation is distinguishable
/// from the "unallocated" and "allocating" sentinels stored in chunk
/// tables.
pub struct MemoryArena {
    cursor: CachePadded<AtomicU32>,
    words: Box<[AtomicU32]>,
}

// Compile-time assertion: MemoryArena must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<MemoryArena>();
};

impl MemoryArena {
    /// Allocation granularity in bytes.
    pub const ALIGNMENT: u32 = 8;

    /// Create an arena from a validated config.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::with_capacity(config.capacity_bytes))
    }

    /// Create a zeroed arena of `capacity_bytes`, rounded up to whole words.
    pub fn with_capacity(capacity_bytes: u32) -> Self {
        debug_assert!(
            capacity_bytes <= u32::MAX - 3,
            "capacity {capacity_bytes} does not fit whole 32-bit words"
        );
        let words: Box<[AtomicU32]> = (0..capacity_bytes.div_ceil(4))
            .map(|_| AtomicU32::new(0))
            .collect();
        debug!(capacity_bytes, "memory arena created");
        Self {
            cursor: CachePadded::new(AtomicU32::new(Self::ALIGNMENT)),
            words,
        }
    }

    /// Reserve `size` bytes, rounded up to [`MemoryArena::ALIGNMENT`].
    ///
    /// Running past capacity is not detected here; the first access to
    /// the overflowing region panics instead.
    #[inline]
    pub fn alloc(&self, size: u32) -> PtrOffset {
        let size = size.next_multiple_of(Self::ALIGNMENT);
        let offset = self.cursor.fetch_add(size, Ordering::Relaxed);
        debug_assert!(
            u64::from(offset) + u64::from(size) <= u64::from(self.capacity_bytes()),
            "arena exhausted: offset {offset} + {size} bytes exceeds capacity {}",
            self.capacity_bytes()
        );
        offset
    }

    /// Convert an allocation offset into an address.
    #[inline]
    pub fn to_addr(&self, offset: PtrOffset) -> Addr {
        Addr(offset)
    }

    /// Current cursor position in bytes, including the sentinel prefix.
    pub fn cursor(&self) -> u32 {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Bytes handed out so far (sum of rounded allocation sizes).
    pub fn used_bytes(&self) -> u32 {
        self.cursor() - Self::ALIGNMENT
    }

    /// Total size of the backing buffer in bytes.
    pub fn capacity_bytes(&self) -> u32 {
        (self.words.len() * 4) as u32
    }

    /// Bytes still available to [`MemoryArena::alloc`].
    pub fn remaining_bytes(&self) -> u32 {
        self.capacity_bytes().saturating_sub(self.cursor())
    }

    /// The atomic word at `addr`.
    ///
    /// `addr` must be 4-byte aligned and inside the buffer.
    #[inline]
    pub fn word(&self, addr: Addr) -> &AtomicU32 {
        debug_assert!(addr.0 % 4 == 0, "unaligned word access at {addr}");
        &self.words[(addr.0 / 4) as usize]
    }

    /// Relaxed load of the word at `addr`.
    #[inline]
    pub fn load(&self, addr: Addr) -> u32 {
        self.word(addr).load(Ordering::Relaxed)
    }

    /// Relaxed store of the word at `addr`.
    #[inline]
    pub fn store(&self, addr: Addr, value: u32) {
        self.word(addr).store(value, Ordering::Relaxed);
    }

    /// Copy `src` into consecutive words starting at `addr`.
    pub fn write_words(&self, addr: Addr, src: &[u32]) {
        let first = (addr.0 / 4) as usize;
        debug_assert!(addr.0 % 4 == 0, "unaligned word access at {addr}");
        for (cell, &value) in self.words[first..first + src.len()].iter().zip(src) {
            cell.store(value, Ordering::Relaxed);
        }
    }

    /// Copy consecutive words starting at `addr` into `dst`.
    pub fn read_words(&self, addr: Addr, dst: &mut [u32]) {
        let first = (addr.0 / 4) as usize;
        let len = dst.len();
        debug_assert!(addr.0 % 4 == 0, "unaligned word access at {addr}");
        for (out, cell) in dst.iter_mut().zip(&self.words[first..first + len]) {
            *out = cell.load(Ordering::Relaxed);
        }
    }
}

impl fmt::Debug for MemoryArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryArena")
            .field("cursor", &self.cursor())
            .field("capacity_bytes", &self.capacity_bytes())
            .finish()
    }
}
