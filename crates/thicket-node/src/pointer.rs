//! Pointer nodes: children allocated lazily from a slot pool.
//!
//! Each child cell holds the raw [`ElemIndex`] of the child's slot and
//! follows the same allocate-once protocol as list chunks:
//! `0` unallocated, `1` allocating, `> 1` a published index. The first
//! activation of a child allocates exactly one slot; concurrent
//! activators spin until that slot is published.
//!
//! Deactivation moves a published cell back to `0` and recycles the
//! index it held. A deactivation that finds the cell at `1` waits for
//! the in-flight allocation to publish and then releases that slot.
//! Overwriting the `1` instead would let a second activator allocate
//! while the first is still in flight, and whichever index was
//! published first would never be recycled.

use std::sync::atomic::{AtomicU32, Ordering};

use crossbeam_utils::Backoff;
use thicket_arena::{Addr, ElemIndex, MemoryArena, SlotPoolManager};
use thicket_core::NodeMeta;
use tracing::trace;

/// A node whose children live in a [`SlotPool`](thicket_arena::SlotPool).
#[derive(Clone, Copy)]
pub struct PointerNode<'a> {
    addr: Addr,
    pool: SlotPoolManager<'a>,
    /// Slot returned for children that are not active.
    ambient: ElemIndex,
}

impl<'a> PointerNode<'a> {
    /// Wrap the cells at `addr`, backed by `pool`.
    ///
    /// `ambient` is a slot preallocated by the driver and shared by
    /// every inactive child; it is never written through this node.
    pub fn new(addr: Addr, pool: SlotPoolManager<'a>, ambient: ElemIndex) -> Self {
        debug_assert!(ambient.is_valid(), "ambient slot must be allocated");
        Self {
            addr,
            pool,
            ambient,
        }
    }

    /// Address of the node's cell array.
    #[inline]
    pub fn addr(&self) -> Addr {
        self.addr
    }

    /// The ambient slot index.
    pub fn ambient(&self) -> ElemIndex {
        self.ambient
    }

    /// Whether child `i` currently has a slot.
    #[inline]
    pub fn is_active(&self, i: u32) -> bool {
        Self::is_active_at(self.pool.arena(), self.addr, i)
    }

    /// Give child `i` a slot if it has none.
    pub fn activate(&self, i: u32) {
        let cell = self.cell(i);
        if ElemIndex::is_valid_raw(cell.load(Ordering::Acquire)) {
            return;
        }

        let backoff = Backoff::new();
        loop {
            match cell.compare_exchange_weak(
                ElemIndex::UNALLOCATED_RAW,
                ElemIndex::ALLOCATING_RAW,
                Ordering::Acquire,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    let index = self.pool.allocate();
                    trace!(child = i, %index, "pointer child allocated");
                    cell.store(index.raw(), Ordering::Release);
                    return;
                }
                Err(raw) if ElemIndex::is_valid_raw(raw) => return,
                Err(_) => backoff.snooze(),
            }
        }
    }

    /// Drop child `i`'s slot and recycle it.
    ///
    /// Spins while another thread is allocating the child, so the slot
    /// it publishes is the one released.
    pub fn deactivate(&self, i: u32) {
        let cell = self.cell(i);
        let backoff = Backoff::new();
        let mut current = cell.load(Ordering::Acquire);
        loop {
            if current == ElemIndex::UNALLOCATED_RAW {
                return;
            }
            if current == ElemIndex::ALLOCATING_RAW {
                backoff.snooze();
                current = cell.load(Ordering::Acquire);
                continue;
            }
            match cell.compare_exchange_weak(
                current,
                ElemIndex::UNALLOCATED_RAW,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.pool.recycle(ElemIndex::from_raw(current));
                    return;
                }
                Err(raw) => current = raw,
            }
        }
    }

    /// The slot index child `i` holds, or [`ElemIndex::INVALID`].
    pub fn child_index(&self, i: u32) -> ElemIndex {
        Self::child_index_at(self.pool.arena(), self.addr, i)
    }

    /// Address of child `i`'s slot, or of the ambient slot if inactive.
    ///
    /// Lets readers load a default value without branching on activity.
    pub fn child_or_ambient_addr(&self, i: u32) -> Addr {
        let index = self.child_index(i);
        let index = if index.is_valid() { index } else { self.ambient };
        self.pool.get(index)
    }

    /// Address of child `i`'s cell in a pointer node stored at `addr`.
    #[inline]
    pub fn cell_addr(addr: Addr, i: u32) -> Addr {
        addr.offset(i * NodeMeta::POINTER_CELL_BYTES)
    }

    /// Slot index held by child `i` of the pointer node at `addr`.
    pub fn child_index_at(arena: &MemoryArena, addr: Addr, i: u32) -> ElemIndex {
        let raw = arena.word(Self::cell_addr(addr, i)).load(Ordering::Acquire);
        ElemIndex::from_raw(raw)
    }

    /// Whether child `i` of the pointer node at `addr` has a slot.
    pub fn is_active_at(arena: &MemoryArena, addr: Addr, i: u32) -> bool {
        Self::child_index_at(arena, addr, i).is_valid()
    }

    #[inline]
    fn cell(&self, i: u32) -> &'a AtomicU32 {
        self.pool.arena().word(Self::cell_addr(self.addr, i))
    }
}
