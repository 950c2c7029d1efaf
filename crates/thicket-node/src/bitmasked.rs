//! Bitmasked nodes: one activation bit per child.
//!
//! The mask words sit immediately after the children array. Each bit is
//! flipped with a single atomic RMW, so activating or deactivating one
//! child never disturbs another. No ordering beyond the bit itself is
//! provided.

use std::sync::atomic::{AtomicU32, Ordering};

use thicket_arena::{Addr, MemoryArena};
use thicket_core::NodeMeta;

const BITS_PER_MASK: u32 = NodeMeta::BITS_PER_MASK;

/// A node tracking child activation in a bitmask.
#[derive(Clone, Copy, Debug)]
pub struct BitmaskedNode<'a> {
    arena: &'a MemoryArena,
    addr: Addr,
    meta_offset: u32,
}

impl<'a> BitmaskedNode<'a> {
    /// Wrap the node at `addr` whose mask starts `meta_offset` bytes in.
    pub fn new(arena: &'a MemoryArena, addr: Addr, meta_offset: u32) -> Self {
        debug_assert!(meta_offset % 4 == 0, "mask offset {meta_offset} not word aligned");
        Self {
            arena,
            addr,
            meta_offset,
        }
    }

    /// Wrap the node at `addr` described by `meta`.
    pub fn from_meta(arena: &'a MemoryArena, addr: Addr, meta: &NodeMeta) -> Self {
        Self::new(arena, addr, meta.meta_offset())
    }

    /// Address of the node.
    #[inline]
    pub fn addr(&self) -> Addr {
        self.addr
    }

    /// Whether child `i`'s bit is set.
    pub fn is_active(&self, i: u32) -> bool {
        let bits = self.mask_word(i).load(Ordering::Relaxed);
        (bits >> (i % BITS_PER_MASK)) & 1 == 1
    }

    /// Set child `i`'s bit.
    pub fn activate(&self, i: u32) {
        let mask = 1 << (i % BITS_PER_MASK);
        self.mask_word(i).fetch_or(mask, Ordering::Relaxed);
    }

    /// Clear child `i`'s bit.
    pub fn deactivate(&self, i: u32) {
        let mask = !(1 << (i % BITS_PER_MASK));
        self.mask_word(i).fetch_and(mask, Ordering::Relaxed);
    }

    #[inline]
    fn mask_word(&self, i: u32) -> &'a AtomicU32 {
        let word = self.addr.offset(self.meta_offset + (i / BITS_PER_MASK) * 4);
        self.arena.word(word)
    }
}
