//! Dynamic nodes: an active prefix tracked by one counter.
//!
//! The counter lives right after the children array. A child is active
//! iff its index is below the counter. Activation only ever widens the
//! prefix; deactivation clears the whole node at once. There is no way
//! to deactivate a single child.

use std::sync::atomic::{AtomicU32, Ordering};

use thicket_arena::{Addr, MemoryArena};
use thicket_core::NodeMeta;

/// A node whose active children form a prefix.
#[derive(Clone, Copy, Debug)]
pub struct DynamicNode<'a> {
    arena: &'a MemoryArena,
    addr: Addr,
    meta_offset: u32,
}

impl<'a> DynamicNode<'a> {
    /// Wrap the node at `addr` whose counter sits `meta_offset` bytes in.
    pub fn new(arena: &'a MemoryArena, addr: Addr, meta_offset: u32) -> Self {
        debug_assert!(meta_offset % 4 == 0, "counter offset {meta_offset} not word aligned");
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

    /// Whether `i` lies inside the active prefix.
    pub fn is_active(&self, i: u32) -> bool {
        i < self.length()
    }

    /// Widen the active prefix to cover `i`.
    ///
    /// Idempotent and order-independent. Bounds are not checked.
    pub fn activate(&self, i: u32) {
        self.counter().fetch_max(i + 1, Ordering::Relaxed);
    }

    /// Deactivate every child.
    pub fn deactivate(&self) {
        self.counter().store(0, Ordering::Relaxed);
    }

    /// Claim the next index and store `data` in that child.
    ///
    /// Children must be 4-byte integers for this to make sense. Bounds
    /// are not checked.
    pub fn append(&self, data: i32) -> u32 {
        let me = self.counter().fetch_add(1, Ordering::Relaxed);
        self.arena.store(self.addr.offset(me * 4), data as u32);
        me
    }

    /// Current length of the active prefix.
    pub fn length(&self) -> u32 {
        self.counter().load(Ordering::Relaxed)
    }

    #[inline]
    fn counter(&self) -> &'a AtomicU32 {
        self.arena.word(self.addr.offset(self.meta_offset))
    }
}
