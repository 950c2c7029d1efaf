//! Fixed-stride slot pool with index recycling.
//!
//! A [`SlotPool`] combines three chunked lists:
//!
//! - `data_list` holds the slots themselves.
//! - `free_list` holds indices that may be handed out again. It is
//!   filled by the generation driver, never by this crate.
//! - `recycled_list` collects indices released during the generation.
//!
//! [`SlotPoolManager::allocate`] walks `free_list` with an atomic cursor
//! and falls back to growing `data_list` once the cursor passes the end.
//! Moving recycled indices into `free_list` is a separate collection
//! step run by the driver between generations.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::debug;

use crate::arena::{Addr, MemoryArena};
use crate::config::PoolConfig;
use crate::error::ArenaError;
use crate::index::ElemIndex;
use crate::list::{ChunkedList, ListHeader};

/// Shared state of one slot pool.
pub struct SlotPool {
    free_list: ListHeader,
    data_list: ListHeader,
    recycled_list: ListHeader,
    /// How many `free_list` entries have been claimed this generation.
    free_list_used: AtomicU32,
}

impl SlotPool {
    /// Create an empty pool.
    pub fn new(config: &PoolConfig) -> Result<Self, ArenaError> {
        let pool = Self {
            free_list: ListHeader::new(&config.index_list())?,
            data_list: ListHeader::new(&config.data_list())?,
            recycled_list: ListHeader::new(&config.index_list())?,
            free_list_used: AtomicU32::new(0),
        };
        debug!(slot_stride = config.slot_stride, "slot pool created");
        Ok(pool)
    }

    /// Size of one slot in bytes.
    pub fn slot_stride(&self) -> u32 {
        self.data_list.element_stride()
    }

    /// Bind this pool to the arena holding its chunks.
    pub fn manager<'a>(&'a self, arena: &'a MemoryArena) -> SlotPoolManager<'a> {
        SlotPoolManager { pool: self, arena }
    }
}

/// Copyable view over a [`SlotPool`] and its arena.
#[derive(Clone, Copy)]
pub struct SlotPoolManager<'a> {
    pool: &'a SlotPool,
    arena: &'a MemoryArena,
}

impl<'a> SlotPoolManager<'a> {
    /// Hand out a slot index.
    ///
    /// Prefers the next unclaimed `free_list` entry. If the cursor has
    /// run past the free list (including when it races ahead of a list
    /// being refilled) a brand-new slot is reserved instead, so an index
    /// is never issued twice.
    pub fn allocate(&self) -> ElemIndex {
        let cur_used = self.pool.free_list_used.fetch_add(1, Ordering::Relaxed);
        let free_list = self.free_list();
        if cur_used < free_list.num_active() {
            return ElemIndex::from_raw(self.arena.load(free_list.addr_of(cur_used)));
        }
        ElemIndex::from_index(self.data_list().reserve_new_elem().index)
    }

    /// Address of the slot named by `index`.
    #[inline]
    pub fn get(&self, index: ElemIndex) -> Addr {
        self.data_list().addr_of(index.index())
    }

    /// Release `index` to the recycled list.
    ///
    /// The slot is not wiped and is not reissued during this generation.
    pub fn recycle(&self, index: ElemIndex) {
        debug_assert!(index.is_valid(), "recycling invalid index");
        let addr = self.recycled_list().append_slot();
        self.arena.store(addr, index.raw());
    }

    /// The arena the pool allocates from.
    pub fn arena(&self) -> &'a MemoryArena {
        self.arena
    }

    /// The shared pool state.
    pub fn pool(&self) -> &'a SlotPool {
        self.pool
    }

    /// View of the list holding slot payloads.
    pub fn data_list(&self) -> ChunkedList<'a> {
        self.pool.data_list.manager(self.arena)
    }

    /// View of the list of reusable indices.
    pub fn free_list(&self) -> ChunkedList<'a> {
        self.pool.free_list.manager(self.arena)
    }

    /// View of the list of indices released this generation.
    pub fn recycled_list(&self) -> ChunkedList<'a> {
        self.pool.recycled_list.manager(self.arena)
    }

    /// Number of `allocate` calls that consulted the free list.
    ///
    /// May exceed the free list's length; the surplus fell through to
    /// fresh slots.
    pub fn free_list_used(&self) -> u32 {
        self.pool.free_list_used.load(Ordering::Relaxed)
    }

    /// Rewind the free-list cursor.
    ///
    /// Only for the generation driver, after it has rebuilt the free
    /// list and while no thread is allocating.
    pub fn reset_free_list_used(&self) {
        self.pool.free_list_used.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn make_pool() -> (SlotPool, MemoryArena) {
        let pool = SlotPool::new(&PoolConfig::new(16).with_chunking(2, 64)).unwrap();
        (pool, MemoryArena::with_capacity(1 << 16))
    }

    #[test]
    fn fresh_pool_allocates_sequentially() {
        let (pool, arena) = make_pool();
        let mgr = pool.manager(&arena);
        let a = mgr.allocate();
        let b = mgr.allocate();
        assert_eq!(a, ElemIndex::from_index(0));
        assert_eq!(b, ElemIndex::from_index(1));
        assert_eq!(mgr.data_list().num_active(), 2);
        assert_eq!(mgr.free_list_used(), 2);
    }

    #[test]
    fn get_returns_distinct_slot_addresses() {
        let (pool, arena) = make_pool();
        let mgr = pool.manager(&arena);
        let a = mgr.get(mgr.allocate());
        let b = mgr.get(mgr.allocate());
        assert_eq!(b.get() - a.get(), pool.slot_stride());
    }

    #[test]
    fn slot_contents_persist() {
        let (pool, arena) = make_pool();
        let mgr = pool.manager(&arena);
        let idx = mgr.allocate();
        arena.write_words(mgr.get(idx), &[9, 8, 7, 6]);
        let mut buf = [0; 4];
        arena.read_words(mgr.get(idx), &mut buf);
        assert_eq!(buf, [9, 8, 7, 6]);
    }

    #[test]
    fn recycle_appends_to_recycled_list_only() {
        let (pool, arena) = make_pool();
        let mgr = pool.manager(&arena);
        let idx = mgr.allocate();
        mgr.recycle(idx);
        let recycled = mgr.recycled_list().typed::<ElemIndex>().unwrap();
        assert_eq!(recycled.num_active(), 1);
        assert_eq!(recycled.get(0), idx);
        // Not reissued within the generation.
        assert_ne!(mgr.allocate(), idx);
    }

    #[test]
    fn free_list_entries_are_preferred() {
        let (pool, arena) = make_pool();
        let mgr = pool.manager(&arena);
        for _ in 0..4 {
            mgr.allocate();
        }
        let free = mgr.free_list().typed::<ElemIndex>().unwrap();
        free.append(&ElemIndex::from_index(2));
        free.append(&ElemIndex::from_index(0));
        mgr.reset_free_list_used();

        assert_eq!(mgr.allocate(), ElemIndex::from_index(2));
        assert_eq!(mgr.allocate(), ElemIndex::from_index(0));
        // Free list exhausted: grow the data list.
        assert_eq!(mgr.allocate(), ElemIndex::from_index(4));
    }

    #[test]
    fn index_lists_hold_elem_indices() {
        assert_eq!(ElemIndex::stride(), PoolConfig::new(8).index_list().element_stride);
    }

    #[test]
    fn invalid_stride_is_rejected() {
        assert!(SlotPool::new(&PoolConfig::new(10)).is_err());
    }
}
