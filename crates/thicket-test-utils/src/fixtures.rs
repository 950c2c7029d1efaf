//! Reusable arena and pool fixtures.
//!
//! - [`TestGeneration`] owns an arena and a slot pool and hands out
//!   node storage.
//! - [`collect_recycled`] rebuilds a pool's free list between
//!   generations.
//! - [`run_concurrently`] starts N scoped threads behind a barrier.

use std::sync::Barrier;

use thicket_arena::{
    Addr, ArenaConfig, ElemIndex, MemoryArena, PoolConfig, SlotPool, SlotPoolManager,
};
use thicket_core::NodeMeta;

/// Arena capacity used when a test does not pick one.
pub const TEST_ARENA_BYTES: u32 = 1 << 20;

/// One arena and one slot pool living for a single test.
pub struct TestGeneration {
    pub arena: MemoryArena,
    pub pool: SlotPool,
}

impl TestGeneration {
    /// A generation whose pool hands out slots of `slot_stride` bytes.
    pub fn new(slot_stride: u32) -> Self {
        Self::with_config(
            &ArenaConfig::new(TEST_ARENA_BYTES),
            &PoolConfig::new(slot_stride).with_chunking(4, 64),
        )
    }

    /// A generation built from explicit configs.
    ///
    /// Panics if either config is invalid.
    pub fn with_config(arena: &ArenaConfig, pool: &PoolConfig) -> Self {
        Self {
            arena: MemoryArena::new(arena).expect("valid arena config"),
            pool: SlotPool::new(pool).expect("valid pool config"),
        }
    }

    /// The pool bound to this generation's arena.
    pub fn pool(&self) -> SlotPoolManager<'_> {
        self.pool.manager(&self.arena)
    }

    /// Zeroed storage for one node of layout `meta`.
    pub fn alloc_node(&self, meta: &NodeMeta) -> Addr {
        let offset = self.arena.alloc(meta.node_bytes().max(4));
        self.arena.to_addr(offset)
    }

    /// Preallocate the ambient slot shared by inactive pointer children.
    pub fn alloc_ambient(&self) -> ElemIndex {
        self.pool().allocate()
    }
}

/// Rebuild `pool`'s free list for the next generation.
///
/// The new free list holds the entries the finished generation did not
/// claim followed by every index recycled during it. The recycled list
/// is emptied and the free-list cursor rewound.
///
/// Must run while no thread is using the pool.
pub fn collect_recycled(pool: SlotPoolManager<'_>) {
    let arena = pool.arena();
    let free = pool.free_list();
    let recycled = pool.recycled_list();

    let claimed = pool.free_list_used().min(free.num_active());
    let mut next: Vec<u32> = (claimed..free.num_active())
        .map(|i| arena.load(free.addr_of(i)))
        .collect();
    next.extend((0..recycled.num_active()).map(|i| arena.load(recycled.addr_of(i))));

    free.clear();
    for raw in next {
        free.append_words(&[raw]);
    }
    recycled.clear();
    pool.reset_free_list_used();
}

/// Run `f(thread_index)` on `threads` scoped threads released together.
pub fn run_concurrently<F>(threads: usize, f: F)
where
    F: Fn(usize) + Sync,
{
    let barrier = Barrier::new(threads);
    std::thread::scope(|s| {
        for t in 0..threads {
            let barrier = &barrier;
            let f = &f;
            s.spawn(move || {
                barrier.wait();
                f(t);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use thicket_core::NodeKind;

    #[test]
    fn alloc_node_is_zeroed_and_disjoint() {
        let gen = TestGeneration::new(16);
        let meta = NodeMeta::new(NodeKind::Bitmasked, 40, 4);
        let a = gen.alloc_node(&meta);
        let b = gen.alloc_node(&meta);
        assert!(b.get() >= a.get() + meta.node_bytes());
        assert_eq!(gen.arena.load(a), 0);
    }

    #[test]
    fn recycled_indices_become_free() {
        let gen = TestGeneration::new(16);
        let pool = gen.pool();
        let a = pool.allocate();
        let b = pool.allocate();
        pool.recycle(a);
        assert_eq!(pool.free_list().num_active(), 0);

        collect_recycled(pool);
        assert_eq!(pool.free_list().num_active(), 1);
        assert_eq!(pool.recycled_list().num_active(), 0);
        assert_eq!(pool.free_list_used(), 0);

        assert_eq!(pool.allocate(), a);
        let c = pool.allocate();
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn unclaimed_free_entries_carry_over() {
        let gen = TestGeneration::new(16);
        let pool = gen.pool();
        let idx: Vec<ElemIndex> = (0..3).map(|_| pool.allocate()).collect();
        for &i in &idx {
            pool.recycle(i);
        }
        collect_recycled(pool);

        // Claim one of the three, leave two.
        let first = pool.allocate();
        collect_recycled(pool);

        assert_eq!(pool.free_list().num_active(), 2);
        let rest: Vec<ElemIndex> = (0..2).map(|_| pool.allocate()).collect();
        assert!(!rest.contains(&first));
        for i in rest {
            assert!(idx.contains(&i));
        }
    }

    #[test]
    fn run_concurrently_runs_every_thread() {
        let hits = AtomicUsize::new(0);
        run_concurrently(6, |_| {
            hits.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(hits.load(Ordering::Relaxed), 6);
    }
}
